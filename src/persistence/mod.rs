pub mod files;
pub mod store;

pub use files::{
    atomic_write, ensure_data_dir, export_file_name, get_data_dir, init_local_dir, log_file,
    state_file,
};
pub use store::{export_state, import_state, load_state, save_state, ImportError};
