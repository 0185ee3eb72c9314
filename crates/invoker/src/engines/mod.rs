pub mod mock;
pub mod process;
pub mod remote;

pub use mock::MockEngine;
pub use process::ProcessEngine;
pub use remote::RemoteEngine;
