use crate::bookings::BookingService;
use crate::chat::ChatService;
use crate::classes::ClassService;
use crate::core::Config;
use crate::members::MemberService;
use crate::notifications::NotificationService;
use crate::store::RecordStore;
use crate::sync::{Broadcaster, ChangeBus};
use crate::utils::{AppError, AppResult};

/// 节点状态 - 持有一个视图的全部服务
///
/// 所有字段都是浅拷贝 (内部 Arc)。同一个数据库上的每个视图
/// (公开日历、管理面板、...) 各持有一个 ServerState，它们共享
/// 存储与变更总线，但拥有各自的 [`ViewId`](shared::ViewId)。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | store | RecordStore | redb 存储 (绑定本视图) |
/// | broadcaster | Broadcaster | 变更宣告 |
/// | classes | ClassService | 课程管理 |
/// | bookings | BookingService | 预订事务与记录 |
/// | members | MemberService | 会员账户 |
/// | chat | ChatService | 客户留言 |
/// | notifications | NotificationService | 管理端通知 |
///
/// # 使用示例
///
/// ```ignore
/// let admin = ServerState::initialize(&config)?;
/// let calendar = admin.open_view();
///
/// admin.classes.add_class(input)?;
/// // calendar 的监听器收到 cottageClasses 的真实存储事件
/// ```
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub store: RecordStore,
    pub broadcaster: Broadcaster,
    pub classes: ClassService,
    pub bookings: BookingService,
    pub members: MemberService,
    pub chat: ChatService,
    pub notifications: NotificationService,
}

impl ServerState {
    /// 在已打开的存储上组装服务
    pub fn new(config: Config, store: RecordStore) -> Self {
        let broadcaster = Broadcaster::with_replay_delay(store.clone(), config.replay_delay());
        let notifications =
            NotificationService::with_cap(store.clone(), broadcaster.clone(), config.notification_cap);
        let members = MemberService::new(store.clone(), notifications.clone());
        let classes = ClassService::new(store.clone(), broadcaster.clone());
        let bookings = BookingService::new(
            store.clone(),
            broadcaster.clone(),
            members.clone(),
            notifications.clone(),
        );
        let chat = ChatService::new(store.clone(), broadcaster.clone(), notifications.clone());

        Self {
            config,
            store,
            broadcaster,
            classes,
            bookings,
            members,
            chat,
            notifications,
        }
    }

    /// 初始化节点状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录
    /// 2. 存储 (work_dir/store_file)
    /// 3. 各服务
    /// 4. 课程种子数据 (缺失或损坏时写入)
    pub fn initialize(config: &Config) -> AppResult<Self> {
        std::fs::create_dir_all(&config.work_dir).map_err(|e| {
            AppError::internal(format!("Failed to create work directory {}: {}", config.work_dir, e))
        })?;

        let bus = ChangeBus::with_capacity(config.channel_capacity);
        let path = config.store_path();
        let store = RecordStore::open(&path, bus)?;
        tracing::info!(path = %path.display(), "Record store opened");

        let state = Self::new(config.clone(), store);
        state.warm_up()?;
        Ok(state)
    }

    /// 内存存储 (测试、临时会话)
    pub fn in_memory(config: Config) -> AppResult<Self> {
        let bus = ChangeBus::with_capacity(config.channel_capacity);
        let store = RecordStore::open_in_memory(bus)?;
        let state = Self::new(config, store);
        state.warm_up()?;
        Ok(state)
    }

    /// 同一存储上打开另一个视图
    pub fn open_view(&self) -> Self {
        Self::new(self.config.clone(), self.store.open_view())
    }

    pub fn bus(&self) -> &ChangeBus {
        self.store.bus()
    }

    fn warm_up(&self) -> AppResult<()> {
        let admin = self.classes.load_admin_classes()?;
        let public = self.classes.load_public_classes()?;
        tracing::info!(
            admin = admin.len(),
            public = public.len(),
            "Class schedule loaded"
        );
        Ok(())
    }

    /// 关闭变更总线 (监听器退出，未触发的重放取消)
    pub fn shutdown(&self) {
        self.bus().shutdown();
    }
}
