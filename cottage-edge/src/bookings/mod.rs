//! 预订
//!
//! - [`transaction`] - 下单事务 (检查座位, 扣减, 追加预订记录)
//! - [`ledger`] - 预订记录查询与状态变更
//! - [`stats`] - 月度统计

pub mod ledger;
pub mod stats;
pub mod transaction;

pub use stats::MonthlyStats;
pub use transaction::BookingError;

use crate::members::MemberService;
use crate::notifications::NotificationService;
use crate::store::RecordStore;
use crate::sync::Broadcaster;

/// 预订服务
///
/// | 依赖 | 用途 |
/// |------|------|
/// | store | 课程/预订集合读写 |
/// | broadcaster | 变更宣告 |
/// | members | 首次预订自动建账户 |
/// | notifications | 管理端新预订通知 |
#[derive(Debug, Clone)]
pub struct BookingService {
    store: RecordStore,
    broadcaster: Broadcaster,
    members: MemberService,
    notifications: NotificationService,
}

impl BookingService {
    pub fn new(
        store: RecordStore,
        broadcaster: Broadcaster,
        members: MemberService,
        notifications: NotificationService,
    ) -> Self {
        Self {
            store,
            broadcaster,
            members,
            notifications,
        }
    }
}
