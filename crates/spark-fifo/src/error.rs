//! FIFO 视图的可恢复错误域。
//!
//! # 角色定位（Why）
//! - 主 API 将越界视为编程错误并直接 panic；但 I/O 驱动报告的字节数、解析器给出的消费长度
//!   往往来自外部实现，调用方需要一条不 panic 的校验路径；
//! - `try_*` 系列方法在拒绝请求时返回本模块的 [`FifoError`]，且保证视图状态不变。
//!
//! # 设计要求（What）
//! - 使用 `thiserror` 派生 `Error`，关闭默认 Feature 后仍可在 `no_std` 中使用；
//! - 每个变体携带请求值与实际上限，并通过 [`FifoError::code`] 暴露稳定错误码，便于日志与指标聚合。

use thiserror::Error;

/// 稳定错误码，命名沿用 `<域>.<原因>` 约定。
pub mod codes {
    /// 提交的写入数量超过尾部可写空间。
    pub const WRITE_OVERFLOW: &str = "fifo.write_overflow";
    /// 消费数量超过未读元素数量。
    pub const CONSUME_OVERFLOW: &str = "fifo.consume_overflow";
    /// 迁移目标存储放不下现有未读数据。
    pub const RELOCATE_TOO_SMALL: &str = "fifo.relocate_too_small";
    /// 试图绑定长度为 0 的存储。
    pub const EMPTY_STORAGE: &str = "fifo.empty_storage";
}

/// `FifoBuffer` 的校验失败原因。
///
/// # 教案式说明
/// - **意图 (Why)**：把“调用方声明的数量与视图实际状态不符”这一类问题显式化，
///   让传输层可以把行为异常的 I/O 实现转化为普通错误而不是进程崩溃；
/// - **契约 (What)**：所有变体均为 `Copy`，不含堆分配；返回该错误时视图的游标保持调用前的值；
/// - **权衡 (Trade-offs)**：仅覆盖可以预先校验的前置条件，`read_into` 的截断属于正常语义，不在此列。
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum FifoError {
    /// 提交写入时超出 `[tail, capacity)` 区间。
    #[error("commit of {requested} elements exceeds the {writable} writable slots after tail")]
    WriteOverflow {
        /// 调用方声明写入的数量。
        requested: usize,
        /// 当前尾部剩余的可写槽位。
        writable: usize,
    },

    /// 消费数量超过未读数据。
    #[error("consume of {requested} elements exceeds the {available} unread elements")]
    ConsumeOverflow {
        /// 调用方声明消费的数量。
        requested: usize,
        /// 当前未读元素数量。
        available: usize,
    },

    /// 迁移目标容量不足。
    #[error("relocation target holds {capacity} slots but {required} unread elements must move")]
    RelocateTooSmall {
        /// 需要搬移的未读元素数量。
        required: usize,
        /// 目标存储的容量。
        capacity: usize,
    },

    /// 绑定的存储为空。
    #[error("cannot bind a fifo view to empty storage")]
    EmptyStorage,
}

impl FifoError {
    /// 返回稳定错误码，参见 [`codes`]。
    pub const fn code(&self) -> &'static str {
        match self {
            FifoError::WriteOverflow { .. } => codes::WRITE_OVERFLOW,
            FifoError::ConsumeOverflow { .. } => codes::CONSUME_OVERFLOW,
            FifoError::RelocateTooSmall { .. } => codes::RELOCATE_TOO_SMALL,
            FifoError::EmptyStorage => codes::EMPTY_STORAGE,
        }
    }
}

#[cfg(feature = "std")]
impl From<FifoError> for std::io::Error {
    fn from(err: FifoError) -> Self {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, err)
    }
}
