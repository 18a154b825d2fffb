use std::sync::Once;

pub mod http;
pub mod text;

static CRYPTO_PROVIDER: Once = Once::new();

/// reqwest 使用 rustls-no-provider，第一次建立 client 前必須先安裝 ring provider
pub fn ensure_rustls_crypto_provider() {
    CRYPTO_PROVIDER.call_once(|| {
        // 已經有其它地方安裝過時會回傳 Err，直接忽略即可
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}
