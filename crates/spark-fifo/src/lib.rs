#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

//! `spark-fifo` 提供不持有内存的游标式 FIFO 缓冲视图。
//!
//! # 模块定位（Why）
//! - 传输层的 socket/文件读循环与上层的分帧解析器之间，需要一块“先进先出”的暂存区：
//!   生产者把数据写到尾部，消费者从头部解析，未解析完的残片留待下一轮拼接；
//! - 内存的申请、扩容与释放由调用方（通常是缓冲池）负责，本 crate 只管理读写游标，
//!   因而可以在 `no_std`、无分配器的环境中使用。
//!
//! # 设计概要（How）
//! - [`FifoBuffer`] 以 `&'a mut [T]` 借用外部存储，维护 `head`（首个未读元素）与 `tail`（已写区间末尾）；
//! - 写入走“两段式”协议：[`FifoBuffer::can_reserve`]/[`FifoBuffer::reserve_write`] 取得可写区间，
//!   写入后 [`FifoBuffer::commit_write`] 发布；读取同理：[`FifoBuffer::peek_read`] 观察，
//!   [`FifoBuffer::consume`] 退役；
//! - 已读空间仅在申请写入且确有需要时才通过搬移（compaction）回收，`consume` 本身始终是 O(1)。
//!
//! # 契约说明（What）
//! - 越界的 `commit_write`/`consume`、容量不足的 `relocate` 属于调用方的编程错误，直接 panic；
//!   需要校验外部输入的场景使用 `try_*` 变体，得到 [`FifoError`]；
//! - `std` Feature 提供 `std::io::Read`/`Write` 适配；`bytes` Feature 提供 `bytes::Buf`/`BufMut` 适配。
//!
//! ```
//! use spark_fifo::FifoBuffer;
//!
//! let mut storage = [0u8; 8];
//! let mut fifo = FifoBuffer::new(&mut storage);
//!
//! // 生产者：预留 -> 写入 -> 提交
//! assert!(fifo.can_reserve(5));
//! fifo.reserve_write()[..5].copy_from_slice(b"hello");
//! fifo.commit_write(5);
//!
//! // 消费者：观察 -> 处理前缀 -> 消费
//! assert_eq!(fifo.peek_read(), b"hello");
//! fifo.consume(2);
//!
//! let mut out = [0u8; 8];
//! assert_eq!(fifo.read_into(&mut out), 3);
//! assert_eq!(&out[..3], b"llo");
//! assert!(fifo.is_empty());
//! ```

mod error;
mod fifo;

#[cfg(feature = "bytes")]
mod buf;
#[cfg(feature = "std")]
mod io;

pub use crate::error::{FifoError, codes};
pub use crate::fifo::FifoBuffer;
