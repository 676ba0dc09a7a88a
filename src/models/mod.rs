pub mod entry_snapshot;
pub mod ignore_set;
pub mod scan_result;
pub mod trash_ledger;

pub use entry_snapshot::{DirectoryEntrySnapshot, EntryGroup};
pub use ignore_set::IgnoreSet;
pub use scan_result::{sort_records, EmptyFolderRecord, ScanEvent, ScanOutcome, ScanReport};
pub use trash_ledger::{TrashEntry, TrashLedger, TrashRejection, TrashResult};
