use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{ChatError, ChatResult};

type HmacSha256 = Hmac<Sha256>;

const SIGNATURE_PREFIX: &str = "sha256=";

/// GitHub webhook 签名校验
pub struct WebhookVerifier {
    secret: Option<String>,
}

impl WebhookVerifier {
    pub fn new(secret: Option<String>) -> Self {
        WebhookVerifier { secret }
    }

    pub fn is_configured(&self) -> bool {
        self.secret.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// 校验 `sha256=<hex>` 格式的签名，比较为常量时间
    pub fn verify(&self, payload: &[u8], signature: &str) -> ChatResult<bool> {
        let secret = self
            .secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ChatError::NotConfigured("GitHub webhook secret".to_string()))?;

        let Some(expected) = signature.strip_prefix(SIGNATURE_PREFIX) else {
            return Ok(false);
        };
        let Ok(expected) = hex::decode(expected) else {
            return Ok(false);
        };

        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| ChatError::InvalidInput(e.to_string()))?;
        mac.update(payload);

        Ok(mac.verify_slice(&expected).is_ok())
    }
}

/// 计算 payload 的签名头，供测试和本地调试构造请求
pub fn sign(secret: &str, payload: &[u8]) -> ChatResult<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| ChatError::InvalidInput(e.to_string()))?;
    mac.update(payload);
    Ok(format!("{}{}", SIGNATURE_PREFIX, hex::encode(mac.finalize().into_bytes())))
}
