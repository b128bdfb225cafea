mod variant_table;
pub use variant_table::{VariantRecord, VariantTableReader, VariantTableError, SampleCall};

mod id_list;
pub use id_list::{read_id_list, IdListError};

mod output;
pub use output::{LogWriter, ScoreRecord, ScoreWriter, OutputError};
