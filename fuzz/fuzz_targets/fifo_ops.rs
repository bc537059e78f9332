#![no_main]

use std::collections::VecDeque;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use spark_fifo::FifoBuffer;

/// Fuzz 输入：一块初始容量与一串缓冲操作。
///
/// - **Why**：游标算法的缺陷通常只在“部分消费 + 搬移 + 迁移”的特定交错下暴露，
///   由 Fuzzer 穷举操作组合比手写用例覆盖面更广。
/// - **How**：所有数量都来自外部输入，统一走 `try_*` 校验路径，越界请求必须被拒绝且不改变状态；
///   合法请求同时作用于 `VecDeque` 影子模型，逐步比对内容。
/// - **What**：任何 panic 或与影子模型不一致都视为缺陷。
#[derive(Debug, Arbitrary)]
struct FifoCase {
    capacity: u8,
    ops: Vec<FifoOp>,
}

#[derive(Debug, Arbitrary)]
enum FifoOp {
    /// `can_reserve` + `reserve_write` + `try_commit_write`。
    Write { data: Vec<u8>, claimed: u8 },
    /// `try_consume`，数量可能越界。
    Consume { n: u8 },
    /// `read_into`，数量按可用数据截断。
    ReadInto { n: u8 },
    /// 显式搬移。
    Compact,
    /// 迁移到指定容量的新存储。
    Relocate { capacity: u8 },
}

fuzz_target!(|case: FifoCase| {
    let capacity = usize::from(case.capacity).max(1);
    // 迁移目标在循环外一次性分配，视图只借用它们。
    let mut arena: Vec<Vec<u8>> = case
        .ops
        .iter()
        .map(|op| match op {
            FifoOp::Relocate { capacity } => vec![0u8; usize::from(*capacity)],
            _ => Vec::new(),
        })
        .collect();
    let mut targets = arena.iter_mut().map(Vec::as_mut_slice);

    let mut primary = vec![0u8; capacity];
    let mut fifo = FifoBuffer::new(&mut primary[..]);
    let mut model: VecDeque<u8> = VecDeque::new();

    for op in &case.ops {
        let target = targets.next();
        match op {
            FifoOp::Write { data, claimed } => {
                if fifo.can_reserve(data.len()) {
                    let room = fifo.reserve_write();
                    assert!(room.len() >= data.len());
                    room[..data.len()].copy_from_slice(data);
                    fifo.commit_write(data.len());
                    model.extend(data.iter().copied());
                } else {
                    assert!(model.len() + data.len() > fifo.capacity());
                }
                let claimed = usize::from(*claimed);
                let before = (fifo.head(), fifo.tail());
                if fifo.try_commit_write(claimed).is_err() {
                    assert_eq!((fifo.head(), fifo.tail()), before);
                } else {
                    // 提交了未显式写入的槽位：内容即存储中的原值，从视图末尾读回以同步模型。
                    let peek = fifo.peek();
                    model.extend(peek[peek.len() - claimed..].iter().copied());
                }
            }
            FifoOp::Consume { n } => {
                let n = usize::from(*n);
                if fifo.try_consume(n).is_ok() {
                    model.drain(..n);
                } else {
                    assert!(n > model.len());
                }
            }
            FifoOp::ReadInto { n } => {
                let mut dest = vec![0u8; usize::from(*n)];
                let copied = fifo.read_into(&mut dest);
                let expected: Vec<u8> = model.drain(..copied).collect();
                assert_eq!(&dest[..copied], expected.as_slice());
            }
            FifoOp::Compact => fifo.compact(),
            FifoOp::Relocate { .. } => {
                if let Some(target) = target {
                    let _ = fifo.try_relocate(target);
                }
            }
        }

        assert!(fifo.head() <= fifo.tail() && fifo.tail() <= fifo.capacity());
        assert_eq!(fifo.available(), model.len());
        assert!(fifo.peek().iter().eq(model.iter()));
    }
});
