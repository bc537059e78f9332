//! `FifoBuffer` 性质验证
//!
//! # 教案级注释概览
//!
//! - **核心目标 (Why)**：以 `VecDeque` 作为影子模型，对随机操作序列逐步比对 `FifoBuffer` 的可观察状态，
//!   验证游标不变式 `head <= tail <= capacity`、搬移不丢失/不重排数据、`available` 记账精确。
//! - **设计手法 (How)**：Proptest 生成 `FifoOp` 序列，`apply` 同时驱动被测视图与影子模型，
//!   每一步之后调用 `check` 断言两者一致。迁移操作在两块备用存储之间来回切换，
//!   借助 `relocate` 归还的旧存储实现循环复用。
//! - **合同 (What)**：
//!   - 写入只在 `can_reserve` 返回 `true` 时发生，且紧随其后的 `reserve_write` 长度不小于请求；
//!   - `can_reserve` 返回 `false` 时，模型中的数据量加请求量必然超过容量，且游标不变；
//!   - 尾部空间足够时 `can_reserve` 不得搬移（惰性搬移）。

use std::collections::VecDeque;

use proptest::prelude::*;
use spark_fifo::FifoBuffer;

const CAPACITY: usize = 16;

#[derive(Clone, Debug)]
enum FifoOp {
    Write(Vec<u8>),
    Consume(usize),
    ReadInto(usize),
    PeekRewrite(u8),
    Compact,
    Relocate,
    Clear,
}

fn op_strategy() -> impl Strategy<Value = FifoOp> {
    prop_oneof![
        4 => proptest::collection::vec(any::<u8>(), 0..=CAPACITY).prop_map(FifoOp::Write),
        3 => (0..=CAPACITY).prop_map(FifoOp::Consume),
        2 => (0..=CAPACITY).prop_map(FifoOp::ReadInto),
        1 => any::<u8>().prop_map(FifoOp::PeekRewrite),
        1 => Just(FifoOp::Compact),
        1 => Just(FifoOp::Relocate),
        1 => Just(FifoOp::Clear),
    ]
}

/// 影子模型：只记录逻辑内容，不关心物理布局。
struct Model {
    items: VecDeque<u8>,
    capacity: usize,
}

fn check(fifo: &FifoBuffer<'_, u8>, model: &Model) {
    assert!(fifo.head() <= fifo.tail());
    assert!(fifo.tail() <= fifo.capacity());
    assert_eq!(fifo.capacity(), model.capacity);
    assert_eq!(fifo.available(), model.items.len());
    assert_eq!(fifo.is_empty(), model.items.is_empty());
    let expected: Vec<u8> = model.items.iter().copied().collect();
    assert_eq!(fifo.peek(), expected.as_slice());
}

fn apply<'a>(
    fifo: &mut FifoBuffer<'a, u8>,
    model: &mut Model,
    spares: &mut Vec<&'a mut [u8]>,
    op: &FifoOp,
) {
    match op {
        FifoOp::Write(data) => {
            let before = (fifo.head(), fifo.tail());
            let tail_had_room = data.len() <= fifo.writable_len();
            if fifo.can_reserve(data.len()) {
                if tail_had_room {
                    assert_eq!((fifo.head(), fifo.tail()), before, "尾部空间足够时不应搬移");
                }
                let room = fifo.reserve_write();
                assert!(room.len() >= data.len());
                room[..data.len()].copy_from_slice(data);
                fifo.commit_write(data.len());
                model.items.extend(data.iter().copied());
            } else {
                assert!(model.items.len() + data.len() > model.capacity);
                assert_eq!((fifo.head(), fifo.tail()), before, "拒绝时不应产生副作用");
            }
        }
        FifoOp::Consume(n) => {
            let n = (*n).min(fifo.available());
            let tail = fifo.tail();
            fifo.consume(n);
            assert_eq!(fifo.tail(), tail, "消费不应移动 tail");
            model.items.drain(..n);
        }
        FifoOp::ReadInto(n) => {
            let mut dest = vec![0u8; *n];
            let copied = fifo.read_into(&mut dest);
            let expected: Vec<u8> = model.items.drain(..copied).collect();
            assert_eq!(copied, (*n).min(copied + model.items.len()));
            assert_eq!(&dest[..copied], expected.as_slice());
        }
        FifoOp::PeekRewrite(mask) => {
            for item in fifo.peek_read().iter_mut() {
                *item ^= *mask;
            }
            for item in model.items.iter_mut() {
                *item ^= *mask;
            }
        }
        FifoOp::Compact => {
            fifo.compact();
            assert_eq!(fifo.head(), 0);
        }
        FifoOp::Relocate => {
            let fits = spares
                .iter()
                .position(|spare| spare.len() >= fifo.available());
            if let Some(index) = fits {
                let target = spares.swap_remove(index);
                model.capacity = target.len();
                if let Some(old) = fifo.relocate(target) {
                    spares.push(old);
                }
                assert_eq!(fifo.head(), 0);
            }
        }
        FifoOp::Clear => {
            fifo.clear();
            model.items.clear();
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// 任意合法操作序列下，视图与影子模型保持一致。
    #[test]
    fn prop_fifo_matches_shadow_model(ops in proptest::collection::vec(op_strategy(), 1..64)) {
        let mut primary = [0u8; CAPACITY];
        let mut larger = [0u8; CAPACITY * 2];
        let mut smaller = [0u8; CAPACITY / 2];
        let mut spares: Vec<&mut [u8]> = vec![&mut larger[..], &mut smaller[..]];
        let mut fifo = FifoBuffer::new(&mut primary);
        let mut model = Model { items: VecDeque::new(), capacity: CAPACITY };

        for op in &ops {
            apply(&mut fifo, &mut model, &mut spares, op);
            check(&fifo, &model);
        }
    }

    /// 连续两次搬移与一次搬移的可观察结果相同。
    #[test]
    fn prop_compaction_is_idempotent(len in 0..=CAPACITY, consumed in 0..=CAPACITY) {
        let consumed = consumed.min(len);
        let mut storage = [0u8; CAPACITY];
        let mut fifo = FifoBuffer::new(&mut storage);
        let data: Vec<u8> = (0..len as u8).collect();
        fifo.reserve_write()[..len].copy_from_slice(&data);
        fifo.commit_write(len);
        fifo.consume(consumed);

        fifo.compact();
        let once = (fifo.head(), fifo.tail(), fifo.peek().to_vec());
        fifo.compact();
        prop_assert_eq!((fifo.head(), fifo.tail(), fifo.peek().to_vec()), once);
        prop_assert_eq!(fifo.peek(), &data[consumed..]);
    }
}
