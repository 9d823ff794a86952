//! 共享测试工具和辅助函数

#![allow(dead_code)]

use std::env;

use proxy_orchestrator_provider::{
    ProviderCredentials, RemoteClient, Zone, create_provider,
};

/// 跳过测试的宏（当环境变量缺失时）
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("跳过测试: 缺少环境变量 {}", $var);
                return;
            }
        )+
    };
}

/// 断言 `Option` 为 `Some`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_some {
    ($expr:expr, $($msg:tt)+) => {{
        let opt = $expr;
        assert!(opt.is_some(), "{}", format_args!($($msg)+));
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// 测试上下文 - 封装 client 和测试 zone
pub struct TestContext {
    pub client: RemoteClient,
    pub zone_name: String,
    pub account_id: Option<String>,
}

impl TestContext {
    /// 创建 Cloudflare 测试上下文
    pub fn cloudflare() -> Option<Self> {
        let api_token = env::var("CLOUDFLARE_API_TOKEN").ok()?;
        let zone_name = env::var("TEST_ZONE").ok()?;
        let account_id = env::var("CLOUDFLARE_ACCOUNT_ID").ok();

        let provider = create_provider(ProviderCredentials::Cloudflare { api_token }).ok()?;

        Some(Self {
            client: RemoteClient::new(provider),
            zone_name,
            account_id,
        })
    }

    /// 查找测试 zone
    pub async fn find_zone(&self) -> Option<Zone> {
        let zones = self
            .client
            .list_all_zones(self.account_id.as_deref())
            .await
            .ok()?;
        zones.into_iter().find(|z| z.name == self.zone_name)
    }
}
