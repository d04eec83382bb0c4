//! 评审状态机
//!
//! 管理单份评审的生命周期状态转换，只允许向前推进

use review_core::{Result, ReviewError, ReviewStatus};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// 评审状态转换事件
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ReviewEvent {
    SaveDraft,
    Submit,
}

impl fmt::Display for ReviewEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewEvent::SaveDraft => write!(f, "SaveDraft"),
            ReviewEvent::Submit => write!(f, "Submit"),
        }
    }
}

/// 评审状态机
#[derive(Debug, Clone)]
pub struct ReviewStateMachine {
    transitions: HashMap<(ReviewStatus, ReviewEvent), ReviewStatus>,
}

impl ReviewStateMachine {
    /// 创建新的状态机实例
    pub fn new() -> Self {
        let mut transitions = HashMap::new();

        // 草稿步骤可选，未开始可直接提交
        transitions.insert((ReviewStatus::NotStarted, ReviewEvent::SaveDraft), ReviewStatus::Draft);
        transitions.insert((ReviewStatus::Draft, ReviewEvent::SaveDraft), ReviewStatus::Draft);
        transitions.insert((ReviewStatus::NotStarted, ReviewEvent::Submit), ReviewStatus::Locked);
        transitions.insert((ReviewStatus::Draft, ReviewEvent::Submit), ReviewStatus::Locked);

        Self { transitions }
    }

    /// 检查状态转换是否有效
    pub fn can_transition(&self, from: ReviewStatus, event: ReviewEvent) -> bool {
        self.transitions.contains_key(&(from, event))
    }

    /// 执行状态转换
    pub fn transition(&self, from: ReviewStatus, event: ReviewEvent) -> Result<ReviewStatus> {
        match self.transitions.get(&(from, event)) {
            Some(to) => Ok(*to),
            None => Err(ReviewError::InvalidStateTransition {
                from: from.to_string(),
                event: event.to_string(),
            }),
        }
    }

    /// 获取所有可能的状态
    pub fn get_all_states() -> Vec<ReviewStatus> {
        vec![ReviewStatus::NotStarted, ReviewStatus::Draft, ReviewStatus::Locked]
    }

    /// 获取状态的所有可能事件
    pub fn get_possible_events(&self, current_state: ReviewStatus) -> Vec<ReviewEvent> {
        let mut events: Vec<ReviewEvent> = self
            .transitions
            .keys()
            .filter(|(state, _)| *state == current_state)
            .map(|(_, event)| *event)
            .collect();
        events.sort_by_key(|event| *event as u8);
        events
    }
}

impl Default for ReviewStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
