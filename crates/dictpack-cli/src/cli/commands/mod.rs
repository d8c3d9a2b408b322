mod fetch;
mod install;
mod list;
mod remove;

pub use fetch::run_fetch;
pub use install::run_install;
pub use list::run_list;
pub use remove::run_remove;
