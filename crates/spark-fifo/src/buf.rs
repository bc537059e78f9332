//! `bytes` 生态适配。
//!
//! - [`Buf`]：`remaining`/`chunk`/`advance` 分别映射到 `available`/`peek`/`consume`；
//! - [`BufMut`]：`chunk_mut` 先搬移再暴露尾部区间，因此 `remaining_mut` 等于 `capacity - available`；
//!   `advance_mut` 映射到 `commit_write`，越界时 panic。

use bytes::{Buf, BufMut, buf::UninitSlice};

use crate::fifo::FifoBuffer;

impl Buf for FifoBuffer<'_, u8> {
    fn remaining(&self) -> usize {
        self.available()
    }

    fn chunk(&self) -> &[u8] {
        self.peek()
    }

    fn advance(&mut self, cnt: usize) {
        self.consume(cnt);
    }
}

// SAFETY: `chunk_mut` 返回的是已初始化的 `&mut [u8]`，`advance_mut` 由 `commit_write`
// 校验不超过尾部区间，`tail` 之前的字节对读端始终可见。
#[allow(unsafe_code)]
unsafe impl BufMut for FifoBuffer<'_, u8> {
    fn remaining_mut(&self) -> usize {
        self.capacity() - self.available()
    }

    unsafe fn advance_mut(&mut self, cnt: usize) {
        self.commit_write(cnt);
    }

    fn chunk_mut(&mut self) -> &mut UninitSlice {
        UninitSlice::new(self.reserve_write())
    }
}

#[cfg(test)]
mod tests {
    use bytes::{Buf, BufMut};

    use crate::FifoBuffer;

    #[test]
    fn buf_reads_big_endian_frames() {
        let mut storage = [0u8; 8];
        let mut fifo = FifoBuffer::new(&mut storage);
        fifo.put_u16(0x0102);
        fifo.put_u32(0x0304_0506);
        assert_eq!(fifo.remaining(), 6);
        assert_eq!(fifo.get_u16(), 0x0102);
        assert_eq!(fifo.get_u32(), 0x0304_0506);
        assert!(!fifo.has_remaining());
    }

    #[test]
    fn put_slice_compacts_consumed_prefix() {
        let mut storage = [0u8; 6];
        let mut fifo = FifoBuffer::new(&mut storage);
        fifo.put_slice(b"abcdef");
        fifo.advance(4);
        assert_eq!(fifo.remaining_mut(), 4);
        fifo.put_slice(b"ghij");
        assert_eq!(fifo.chunk(), b"efghij");
        assert_eq!(fifo.head(), 0);
    }

    #[test]
    #[should_panic]
    fn put_slice_beyond_capacity_panics() {
        let mut storage = [0u8; 2];
        let mut fifo = FifoBuffer::new(&mut storage);
        fifo.put_slice(b"abc");
    }
}
