use alloc::boxed::Box;
use alloc::vec;

/// 位组，每一位指示一个槽位
type Group = u64;

const GROUP_BITS: usize = Group::BITS as usize;

/// 定长表的分配位图，记录槽位的占用情况；置 1 表示已占用。
///
/// 索引节点表、数据块池、打开文件表都用它管理空闲槽位。
#[derive(Debug)]
pub struct Bitmap {
    groups: Box<[Group]>,
    /// 可分配的槽位数
    capacity: usize,
}

/// 槽位编号
struct SlotId(u32);

impl Bitmap {
    pub fn new(capacity: usize) -> Self {
        let mut groups = vec![0; capacity.div_ceil(GROUP_BITS)].into_boxed_slice();

        // 末组超出容量的位预先占住，分配时便不会越界
        let tail = capacity % GROUP_BITS;
        if let Some(last) = groups.last_mut().filter(|_| tail != 0) {
            *last = Group::MAX << tail;
        }

        Self { groups, capacity }
    }

    /// 分配新的槽位，返回其编号。
    /// 若位图的空间用尽，则返回空。
    pub fn alloc(&mut self) -> Option<u32> {
        // 寻找还有剩余空间的位组(即还有0)
        let (group_index, ingroup_index) =
            self.groups
                .iter()
                .enumerate()
                .find_map(|(group_index, &bits)| {
                    (bits != Group::MAX).then_some((group_index, bits.trailing_ones()))
                })?;

        self.groups[group_index] |= 1 << ingroup_index;
        Some(SlotId::encode(group_index, ingroup_index as usize))
    }

    pub fn dealloc(&mut self, id: u32) {
        assert!((id as usize) < self.capacity, "slot {id} out of range");
        let (group_index, ingroup_index) = SlotId(id).decode();

        // 编号一定得有对应的位
        assert_ne!(self.groups[group_index] & (1 << ingroup_index), 0);

        self.groups[group_index] &= !(1 << ingroup_index);
    }

    pub fn is_allocated(&self, id: u32) -> bool {
        if id as usize >= self.capacity {
            return false;
        }

        let (group_index, ingroup_index) = SlotId(id).decode();
        self.groups[group_index] & (1 << ingroup_index) != 0
    }

    /// 已占用的槽位数
    pub fn used(&self) -> usize {
        let padding = self.groups.len() * GROUP_BITS - self.capacity;
        let ones: usize = self
            .groups
            .iter()
            .map(|bits| bits.count_ones() as usize)
            .sum();

        ones - padding
    }
}

impl SlotId {
    #[inline]
    fn encode(group_index: usize, ingroup_index: usize) -> u32 {
        (group_index * GROUP_BITS + ingroup_index) as u32
    }

    #[inline]
    fn decode(self) -> (usize, usize) {
        let id = self.0 as usize;
        (id / GROUP_BITS, id % GROUP_BITS)
    }
}
