pub mod blkid;
pub mod fdisk;
pub mod lvm;
pub mod mkfs;
pub mod mount;
pub mod os;
pub mod service;
pub mod user;

// See linux/block/partition-generic.c
//
// disk_name() is used by partition check code and the genhd driver.
// It formats the devicename of the indicated disk into
// the supplied buffer (of size at least 32), and returns
// a pointer to that same buffer (for convenience).
//
// char *disk_name(struct gendisk *hd, int partno, char *buf)
// {
// 	if (!partno)
// 		snprintf(buf, BDEVNAME_SIZE, "%s", hd->disk_name);
// 	else if (isdigit(hd->disk_name[strlen(hd->disk_name)-1]))
// 		snprintf(buf, BDEVNAME_SIZE, "%sp%d", hd->disk_name, partno);
// 	else
// 		snprintf(buf, BDEVNAME_SIZE, "%s%d", hd->disk_name, partno);
// 	return buf;
// }
//
pub(crate) fn partition_name(name: &str, part_number: usize) -> String {
    match name.chars().last() {
        Some(c) if c.is_ascii_digit() => format!("{name}p{part_number}"),
        _ => format!("{name}{part_number}"),
    }
}

/// Partition number from a kernel partition name, e.g. 12 for `/dev/sda12`
pub(crate) fn partition_number(name: &str) -> Option<usize> {
    let digits: String = name
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    digits.parse().ok()
}
