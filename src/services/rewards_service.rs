//! Rewards service - business capability layer
//!
//! The points ledger lives on the server; this service reads balances and
//! issues redeem/adjust requests after local pre-checks.

use tracing::info;

use crate::clients::ApiClient;
use crate::error::{AppError, AppResult, BusinessError};
use crate::models::{
    AdjustmentResult, PointsAdjustment, RedemptionResult, Reward, RewardDraft, Role, StudentPoints,
    StudentPointsSummary,
};

#[derive(Debug, Clone)]
pub struct RewardsService {
    client: ApiClient,
}

impl RewardsService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Rewards visible to the logged-in user (teacher's own or the student's teacher's)
    pub async fn list(&self) -> AppResult<Vec<Reward>> {
        self.client.list_rewards().await
    }

    pub async fn create(&self, draft: &RewardDraft) -> AppResult<Reward> {
        self.client.session().require(Role::Teacher)?;
        draft.validate()?;
        let reward = self.client.create_reward(draft).await?;
        info!("🎁 Created reward \"{}\" ({} pts)", reward.title, reward.points_cost);
        Ok(reward)
    }

    pub async fn update(&self, id: &str, draft: &RewardDraft) -> AppResult<Reward> {
        self.client.session().require(Role::Teacher)?;
        draft.validate()?;
        self.client.update_reward(id, draft).await
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.client.session().require(Role::Teacher)?;
        self.client.delete_reward(id).await?;
        Ok(())
    }

    /// Creates the default reward catalogue on the server
    pub async fn initialize_defaults(&self) -> AppResult<Option<String>> {
        self.client.session().require(Role::Teacher)?;
        Ok(self.client.initialize_rewards().await?.message)
    }

    pub async fn my_points(&self) -> AppResult<StudentPoints> {
        self.client.session().require(Role::Student)?;
        self.client.student_points().await
    }

    /// Redeems a reward after checking the balance locally
    ///
    /// # Arguments
    /// - `reward_id`: must be one of the listed rewards
    ///
    /// # Returns
    /// The server's confirmation and remaining balance
    pub async fn redeem(&self, reward_id: &str) -> AppResult<RedemptionResult> {
        self.client.session().require(Role::Student)?;
        let (rewards, points) =
            futures::try_join!(self.client.list_rewards(), self.client.student_points())?;

        let reward = rewards.iter().find(|r| r.id == reward_id).ok_or_else(|| {
            AppError::from_status(
                "/student/redeem",
                404,
                Some(format!("Reward {} not found", reward_id)),
            )
        })?;
        check_redeemable(reward, points.total_points)?;

        let result = self.client.redeem_reward(reward_id).await?;
        info!(
            "{} Redeemed \"{}\", {} points left",
            reward.icon(),
            reward.title,
            result.remaining_points
        );
        Ok(result)
    }

    pub async fn class_points(&self) -> AppResult<Vec<StudentPointsSummary>> {
        self.client.session().require(Role::Teacher)?;
        self.client.teacher_student_points().await
    }

    pub async fn adjust(&self, adjustment: &PointsAdjustment) -> AppResult<AdjustmentResult> {
        self.client.session().require(Role::Teacher)?;
        adjustment.validate()?;
        let result = self.client.adjust_points(adjustment).await?;
        info!(
            "⚖️ Adjusted {} by {}, new total {}",
            adjustment.student_id, result.points_adjusted, result.new_total
        );
        Ok(result)
    }
}

fn check_redeemable(reward: &Reward, balance: i64) -> Result<(), BusinessError> {
    if !reward.affordable_with(balance) {
        return Err(BusinessError::InsufficientPoints {
            cost: reward.points_cost,
            balance,
        });
    }
    Ok(())
}
