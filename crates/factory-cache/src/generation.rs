//! 分析批次世代追蹤
//!
//! 同一工廠可能同時有多個分析批次在進行。每個批次開始時取得遞增的世代編號，
//! 完成時若已有較新的結果被接受，則捨棄此批次的結果。

use std::collections::HashMap;

use uuid::Uuid;

/// 分析批次憑證
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassTicket {
    pub factory_id: Uuid,
    pub generation: u64,
}

/// 批次世代追蹤器
#[derive(Debug, Default)]
pub struct PassTracker {
    /// 已發出的最新世代
    issued: HashMap<Uuid, u64>,

    /// 已接受結果的最新世代
    accepted: HashMap<Uuid, u64>,
}

impl PassTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 開始新的分析批次
    pub fn begin(&mut self, factory_id: Uuid) -> PassTicket {
        let generation = self.issued.entry(factory_id).or_insert(0);
        *generation += 1;
        PassTicket {
            factory_id,
            generation: *generation,
        }
    }

    /// 完成批次；回傳 `false` 表示結果已過期，應捨棄
    pub fn complete(&mut self, ticket: PassTicket) -> bool {
        let accepted = self.accepted.entry(ticket.factory_id).or_insert(0);
        if ticket.generation <= *accepted {
            tracing::debug!(
                "捨棄工廠 {} 的過期分析（世代 {}，已接受 {}）",
                ticket.factory_id,
                ticket.generation,
                accepted
            );
            return false;
        }
        *accepted = ticket.generation;
        true
    }

    /// 是否為最新發出的批次
    pub fn is_current(&self, ticket: PassTicket) -> bool {
        self.issued.get(&ticket.factory_id) == Some(&ticket.generation)
    }

    /// 已接受的最新世代
    pub fn accepted_generation(&self, factory_id: Uuid) -> Option<u64> {
        self.accepted.get(&factory_id).copied()
    }
}
