//! Outbound bodies for account mutations.

use super::PositionMode;
use crate::shared::{MarginMode, PositionSide};
use serde::Serialize;

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SetLeverageBody<'a> {
    pub inst_id: &'a str,
    pub lever: &'a str,
    pub mgn_mode: MarginMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos_side: Option<PositionSide>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SetPositionModeBody {
    pub pos_mode: PositionMode,
}
