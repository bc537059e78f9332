use core::{fmt, mem};

use tracing::{debug, trace};

use crate::error::FifoError;

/// `FifoBuffer` 是覆盖调用方存储的先进先出缓冲视图。
///
/// # 设计动机（Why）
/// - 读循环需要把 socket/文件中的数据追加到尾部，解析器从头部逐段取走，
///   未成帧的残片必须原样保留到下一轮；
/// - 内存由缓冲池或栈上数组提供，视图本身不分配、不释放，只维护两个游标，
///   因此可以嵌入任意内存策略之上。
///
/// # 结构解析（How）
/// - `storage`：对外部存储的独占借用，`None` 表示未绑定；其长度即容量；
/// - `head`：首个未读元素的下标；`tail`：已写区间末尾的下一个下标；
/// - 任意时刻满足 `0 <= head <= tail <= capacity`，未读数据为 `[head, tail)`；
/// - 已读区域 `[0, head)` 只在写端申请空间时才通过一次整体搬移（compaction）归还，
///   且 `head == 0` 时搬移退化为一次判断。`consume` 永远不搬移数据。
///
/// # 契约说明（What）
/// - 写端协议：[`can_reserve`](Self::can_reserve) / [`reserve_write`](Self::reserve_write)
///   → 写入 → [`commit_write`](Self::commit_write)；
/// - 读端协议：[`peek_read`](Self::peek_read) → 处理前缀 → [`consume`](Self::consume)；
/// - 数量越界属于编程错误，通过 `assert!` 直接 panic，不会被静默截断；
///   唯一例外是 [`read_into`](Self::read_into)，它按“尽量多读”的语义截断到可用数量。
///
/// # 风险与取舍（Trade-offs）
/// - 视图不是线程安全的共享结构：跨线程交接需要调用方自行同步，或整体移动视图的所有权；
/// - 搬移与迁移需要 `T: Copy`，对应 `memmove`/`memcpy` 语义；只读/游标操作对 `T` 无约束。
pub struct FifoBuffer<'a, T> {
    head: usize,
    tail: usize,
    storage: Option<&'a mut [T]>,
}

impl<'a, T> FifoBuffer<'a, T> {
    /// 构造未绑定的空视图。
    pub const fn null() -> Self {
        Self {
            head: 0,
            tail: 0,
            storage: None,
        }
    }

    /// 绑定到 `storage`，游标从 0 开始。
    pub fn new(storage: &'a mut [T]) -> Self {
        Self {
            head: 0,
            tail: 0,
            storage: Some(storage),
        }
    }

    /// 视图当前是否未引用任何存储。
    pub fn is_null(&self) -> bool {
        self.storage.is_none()
    }

    /// 视图当前是否引用了存储。
    pub fn is_defined(&self) -> bool {
        !self.is_null()
    }

    /// 绑定存储的元素槽位总数，未绑定时为 0。
    pub fn capacity(&self) -> usize {
        self.storage.as_deref().map_or(0, <[T]>::len)
    }

    /// 首个未读元素的下标。
    pub fn head(&self) -> usize {
        self.head
    }

    /// 已写区间末尾的下标。
    pub fn tail(&self) -> usize {
        self.tail
    }

    /// 未读元素数量，即 `tail - head`。
    pub fn available(&self) -> usize {
        self.tail - self.head
    }

    /// 不经搬移即可写入的连续槽位数，即 `capacity - tail`。
    pub fn writable_len(&self) -> usize {
        self.capacity() - self.tail
    }

    /// 没有未读数据时返回 `true`。
    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    /// `head == 0 && tail == capacity`：搬移也无法再腾出空间。
    pub fn is_full(&self) -> bool {
        self.head == 0 && self.tail == self.capacity()
    }

    /// 以只读方式访问整块绑定存储（包含已读与未写区域）。
    pub fn storage(&self) -> Option<&[T]> {
        self.storage.as_deref()
    }

    /// 取走当前视图的全部状态，原位置留下未绑定的视图。
    ///
    /// 与 Rust 的按值移动等价，适用于只能拿到 `&mut FifoBuffer` 的场景（例如结构体字段）。
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }

    /// 切换到新的存储，丢弃尚未读取的数据。
    ///
    /// # 教案式说明
    /// - **意图 (Why)**：连接复用或缓冲池轮换时，直接换上一块新内存；
    /// - **契约 (What)**：`storage` 必须非空，否则 panic；游标复位为 0；
    ///   返回此前绑定的存储，调用方可将其归还给池；
    /// - **风险 (Trade-offs)**：未读数据会被丢弃，需要保留时请改用 [`relocate`](Self::relocate)。
    pub fn rebind(&mut self, storage: &'a mut [T]) -> Option<&'a mut [T]> {
        assert!(!storage.is_empty(), "FifoBuffer::rebind 要求非空存储");
        self.bind(storage)
    }

    /// [`rebind`](Self::rebind) 的校验版本：存储为空时返回 [`FifoError::EmptyStorage`]，视图保持不变。
    pub fn try_rebind(
        &mut self,
        storage: &'a mut [T],
    ) -> Result<Option<&'a mut [T]>, FifoError> {
        if storage.is_empty() {
            debug!(code = FifoError::EmptyStorage.code(), "fifo rebind rejected");
            return Err(FifoError::EmptyStorage);
        }
        Ok(self.bind(storage))
    }

    fn bind(&mut self, storage: &'a mut [T]) -> Option<&'a mut [T]> {
        trace!(capacity = storage.len(), dropped = self.available(), "fifo rebound");
        self.head = 0;
        self.tail = 0;
        self.storage.replace(storage)
    }

    /// 解除绑定并归还此前的存储，视图回到未绑定状态。
    pub fn unbind(&mut self) -> Option<&'a mut [T]> {
        if self.storage.is_some() {
            trace!(dropped = self.available(), "fifo unbound");
        }
        self.head = 0;
        self.tail = 0;
        self.storage.take()
    }

    /// 清空游标，丢弃全部缓冲内容；不触碰存储与容量。
    pub fn clear(&mut self) {
        self.head = 0;
        self.tail = 0;
    }

    /// 宣告 `n` 个元素已写入 [`reserve_write`](Self::reserve_write) 返回的区间。
    ///
    /// # 契约说明（What）
    /// - **前置条件**：`n <= capacity - tail`，即不得超过最近一次预留的区间，否则 panic；
    /// - **后置条件**：`tail += n`，[`available`](Self::available) 恰好增加 `n`。
    pub fn commit_write(&mut self, n: usize) {
        let writable = self.writable_len();
        assert!(
            n <= writable,
            "FifoBuffer::commit_write 超出可写区间：请求 {n}，剩余 {writable}"
        );
        self.tail += n;
    }

    /// [`commit_write`](Self::commit_write) 的校验版本，拒绝时游标不变。
    pub fn try_commit_write(&mut self, n: usize) -> Result<(), FifoError> {
        let writable = self.writable_len();
        if n > writable {
            let err = FifoError::WriteOverflow {
                requested: n,
                writable,
            };
            debug!(code = err.code(), requested = n, writable, "fifo commit rejected");
            return Err(err);
        }
        self.tail += n;
        Ok(())
    }

    /// 以只读方式观察未读区间 `[head, tail)`。
    pub fn peek(&self) -> &[T] {
        match self.storage.as_deref() {
            Some(storage) => &storage[self.head..self.tail],
            None => &[],
        }
    }

    /// 返回未读区间 `[head, tail)` 的可变视图。
    ///
    /// 可变性用于原地解析（例如就地转换大小写、替换分隔符），
    /// 区间长度固定，不能借此扩展已写数据。
    pub fn peek_read(&mut self) -> &mut [T] {
        let (head, tail) = (self.head, self.tail);
        match self.storage.as_deref_mut() {
            Some(storage) => &mut storage[head..tail],
            None => Default::default(),
        }
    }

    /// 将前 `n` 个未读元素标记为已消费。
    ///
    /// # 契约说明（What）
    /// - **前置条件**：`n <= available()`，否则 panic；
    /// - **后置条件**：`head += n`；被消费的槽位在下一次搬移之前不会被复用；
    /// - 本方法不搬移任何数据，重复的小块消费不会产生额外开销。
    pub fn consume(&mut self, n: usize) {
        let available = self.available();
        assert!(
            n <= available,
            "FifoBuffer::consume 超出未读数据：请求 {n}，可用 {available}"
        );
        self.head += n;
    }

    /// [`consume`](Self::consume) 的校验版本，拒绝时游标不变。
    pub fn try_consume(&mut self, n: usize) -> Result<(), FifoError> {
        let available = self.available();
        if n > available {
            let err = FifoError::ConsumeOverflow {
                requested: n,
                available,
            };
            debug!(code = err.code(), requested = n, available, "fifo consume rejected");
            return Err(err);
        }
        self.head += n;
        Ok(())
    }

    /// 尾部区间 `[tail, capacity)`，不触发搬移。
    pub(crate) fn spare_mut(&mut self) -> &mut [T] {
        let tail = self.tail;
        match self.storage.as_deref_mut() {
            Some(storage) => &mut storage[tail..],
            None => Default::default(),
        }
    }
}

impl<'a, T: Copy> FifoBuffer<'a, T> {
    /// 将未读区间搬移到存储起始处，回收 `[0, head)` 的已读空间。
    ///
    /// # 教案式说明
    /// - **执行步骤 (How)**：
    ///   1. `head == 0` 时没有可回收的空间，直接返回；
    ///   2. 否则以 `copy_within` 将 `[head, tail)` 整体前移到 `[0, tail - head)`，
    ///      源与目标可能重叠，语义等同 `memmove`；
    ///   3. 更新 `tail -= head`、`head = 0`。
    /// - **契约 (What)**：未读元素的内容与顺序保持不变；代价为 O(未读数量)，与容量无关；
    ///   连续调用两次与调用一次的可观察结果相同。
    /// - **风险 (Trade-offs)**：写路径会在需要时自动调用本方法，调用方通常无需手动触发；
    ///   在每次 `consume` 后主动搬移会把 O(1) 的消费变成 O(n)，应避免。
    pub fn compact(&mut self) {
        if self.head == 0 {
            return;
        }

        let (head, tail) = (self.head, self.tail);
        if let Some(storage) = self.storage.as_deref_mut() {
            storage.copy_within(head..tail, 0);
        }
        self.tail = tail - head;
        self.head = 0;
        trace!(moved = self.tail, reclaimed = head, "fifo compacted");
    }

    /// 准备写入：必要时先搬移，再返回尾部可写区间 `[tail, capacity)`。
    ///
    /// 调用方直接向返回的切片写入，随后以 [`commit_write`](Self::commit_write) 宣告实际写入数量。
    /// 未绑定的视图返回空切片。
    pub fn reserve_write(&mut self) -> &mut [T] {
        self.compact();
        self.spare_mut()
    }

    /// 确保尾部至少有 `n` 个连续可写槽位。
    ///
    /// # 教案式说明
    /// - **意图 (Why)**：生产者在发起读取前确认一次至少能写下 `n` 个元素（例如一个完整的帧头），
    ///   这是一个“腾挪空间”的检查，而不是纯查询；
    /// - **执行步骤 (How)**：
    ///   1. 尾部空间已足够时立即返回 `true`，不搬移；
    ///   2. 计算 `available + n`，超过容量时即使搬移也放不下，返回 `false` 且不产生副作用；
    ///   3. 否则执行一次搬移并返回 `true`。
    /// - **契约 (What)**：返回 `true` 后紧接着的 [`reserve_write`](Self::reserve_write)
    ///   保证返回长度不小于 `n` 的区间。
    pub fn can_reserve(&mut self, n: usize) -> bool {
        if n <= self.writable_len() {
            return true;
        }

        let in_use = self.available();
        if n > self.capacity() - in_use {
            return false;
        }

        self.compact();
        debug_assert!(n <= self.writable_len());
        true
    }

    /// 把未读数据迁移到新的存储，并返回此前绑定的存储。
    ///
    /// # 教案式说明
    /// - **意图 (Why)**：缓冲池扩容（或在数据量回落后缩容）时，需要换上一块新内存但保留未解析的残片；
    ///   申请与释放由调用方完成，本方法只负责搬移逻辑窗口；
    /// - **执行步骤 (How)**：将 `[head, tail)` 复制到 `new_storage` 起始处，采用新存储，
    ///   并令 `head = 0`、`tail = 原 tail - 原 head`；
    /// - **契约 (What)**：
    ///   - **前置条件**：`new_storage.len() >= available()`，否则 panic；
    ///   - **后置条件**：未读元素内容与顺序不变，容量变为 `new_storage.len()`；
    ///     未绑定的视图迁移后即绑定到新存储。
    /// - **风险 (Trade-offs)**：旧存储中的数据不会被清除，归还给池前如有保密需求需自行擦除。
    pub fn relocate(&mut self, new_storage: &'a mut [T]) -> Option<&'a mut [T]> {
        let required = self.available();
        assert!(
            new_storage.len() >= required,
            "FifoBuffer::relocate 目标容量不足：需要 {required}，提供 {}",
            new_storage.len()
        );
        self.move_to(new_storage)
    }

    /// [`relocate`](Self::relocate) 的校验版本，拒绝时视图与两块存储均保持不变。
    pub fn try_relocate(
        &mut self,
        new_storage: &'a mut [T],
    ) -> Result<Option<&'a mut [T]>, FifoError> {
        let required = self.available();
        if new_storage.len() < required {
            let err = FifoError::RelocateTooSmall {
                required,
                capacity: new_storage.len(),
            };
            debug!(
                code = err.code(),
                required,
                capacity = new_storage.len(),
                "fifo relocation rejected"
            );
            return Err(err);
        }
        Ok(self.move_to(new_storage))
    }

    fn move_to(&mut self, new_storage: &'a mut [T]) -> Option<&'a mut [T]> {
        let len = self.available();
        if let Some(old) = self.storage.as_deref() {
            new_storage[..len].copy_from_slice(&old[self.head..self.tail]);
        }
        trace!(
            moved = len,
            from_capacity = self.capacity(),
            to_capacity = new_storage.len(),
            "fifo relocated"
        );
        self.head = 0;
        self.tail = len;
        self.storage.replace(new_storage)
    }

    /// 把未读数据复制到 `dest` 并消费，返回实际复制的数量。
    ///
    /// 请求数量为 `dest.len()`，超出可用数据时截断为 [`available`](Self::available)；
    /// 截断是“尽量多读”的正常语义，不视为错误。不会阻塞。
    pub fn read_into(&mut self, dest: &mut [T]) -> usize {
        let n = dest.len().min(self.available());
        dest[..n].copy_from_slice(&self.peek()[..n]);
        self.consume(n);
        n
    }
}

impl<T> Default for FifoBuffer<'_, T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T> fmt::Debug for FifoBuffer<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FifoBuffer")
            .field("bound", &self.is_defined())
            .field("head", &self.head)
            .field("tail", &self.tail)
            .field("capacity", &self.capacity())
            .finish()
    }
}
