//! 类型定义模块

mod account;
mod change;
mod options;
mod run;

pub use account::Account;
pub use change::{ChangeAction, ChangeLog, ChangeRecord};
pub use options::{DisableOptions, RestoreOptions, Scope};
pub use run::{AccountStats, RunResult};

// Re-export provider 库的公共类型
pub use proxy_orchestrator_provider::{
    DnsRecord, DnsRecordType, ProviderCredentials, RemoteAccount, TokenInfo, Zone,
};
