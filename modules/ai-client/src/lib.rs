pub mod claude;
pub mod traits;
pub mod util;

pub use claude::Claude;
pub use traits::CompletionModel;
pub use util::{extract_json_array, extract_json_object, strip_code_blocks};
