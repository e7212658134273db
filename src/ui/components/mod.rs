mod command_input;
mod confirm;
mod context_menu;
mod data_table;
mod form;
mod input;
mod key_result;
mod search_input;
mod toast;

pub use command_input::{CommandEvent, CommandInput};
pub use confirm::{ConfirmDialog, ConfirmEvent};
pub use context_menu::{ContextMenu, MenuEvent};
pub use data_table::{Column, DataTable, TableText};
pub use form::{Form, FormEvent, FormField};
pub use key_result::KeyResult;
pub use search_input::{SearchEvent, SearchInput};
pub use toast::Toasts;
