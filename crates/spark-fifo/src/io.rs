//! `std::io` 适配：让 `FifoBuffer<'_, u8>` 直接挂接到阻塞式读写循环。
//!
//! # 设计概要（How）
//! - [`Read`] 等价于 [`FifoBuffer::read_into`]，按“尽量多读”截断；
//! - [`Write`] 只在尾部空间不足时才搬移，写满后返回 `Ok(0)`，由 `write_all` 转换为 `WriteZero`；
//! - [`FifoBuffer::read_from`]/[`FifoBuffer::write_to`] 是传输层常用的“泵送”辅助：
//!   每次只调用一次底层 `read`/`write`，并以校验版本的提交/消费拒绝异常的返回值。

use std::io::{self, Read, Write};

use crate::fifo::FifoBuffer;

impl Read for FifoBuffer<'_, u8> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.read_into(buf))
    }
}

impl Write for FifoBuffer<'_, u8> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.can_reserve(buf.len()) {
            // 整体放不下时先回收已读空间，再尽量写入前缀。
            self.compact();
        }
        let room = self.spare_mut();
        let n = room.len().min(buf.len());
        room[..n].copy_from_slice(&buf[..n]);
        self.commit_write(n);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl FifoBuffer<'_, u8> {
    /// 从 `reader` 读取一次，填充空闲空间并提交实际读取的字节数。
    ///
    /// # 教案式说明
    /// - **执行步骤 (How)**：先通过 [`reserve_write`](Self::reserve_write) 回收已读空间，
    ///   再把整段尾部区间交给 `reader.read`，最后以 [`try_commit_write`](Self::try_commit_write) 提交；
    /// - **契约 (What)**：
    ///   - 返回 `Ok(0)` 表示 `reader` 到达 EOF，或缓冲已满没有可写空间，调用方可用
    ///     [`is_full`](Self::is_full) 区分；缓冲已满时不会调用 `reader`；
    ///   - `reader` 返回的字节数超过提供的区间时返回 `InvalidInput`，游标不变；
    ///   - `reader` 的错误（含 `Interrupted`）原样返回。
    pub fn read_from<R: Read + ?Sized>(&mut self, reader: &mut R) -> io::Result<usize> {
        let room = self.reserve_write();
        if room.is_empty() {
            return Ok(0);
        }
        let n = reader.read(room)?;
        self.try_commit_write(n)?;
        Ok(n)
    }

    /// 把未读数据交给 `writer` 写一次，并消费实际写出的字节数。
    ///
    /// 没有未读数据时返回 `Ok(0)` 且不调用 `writer`；`writer` 报告的写出量超过未读数据时
    /// 返回 `InvalidInput`，游标不变。
    pub fn write_to<W: Write + ?Sized>(&mut self, writer: &mut W) -> io::Result<usize> {
        if self.is_empty() {
            return Ok(0);
        }
        let n = writer.write(self.peek())?;
        self.try_consume(n)?;
        Ok(n)
    }
}
