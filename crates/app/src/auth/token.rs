//! Bearer token material.
//!
//! Tokens look like `rv_v1_<token uuid>.<64 hex secret>`. The secret never
//! leaves this module except through [`BearerToken::expose`] and
//! [`BearerToken::verifier_input`].

use std::{
    fmt::{self, Write as _},
    str::FromStr,
};

use rand::{RngCore, rngs::OsRng};
use thiserror::Error;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::domain::users::records::UserUuid;

const PREFIX: &str = "rv";

const SECRET_LEN: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiTokenError {
    #[error("api token format is invalid")]
    InvalidFormat,

    #[error("api token uses an unsupported version")]
    UnsupportedVersion,

    #[error("api token secret encoding is invalid")]
    InvalidSecretEncoding,
}

/// Token layout version, stored next to the verifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiTokenVersion {
    V1,
}

impl ApiTokenVersion {
    #[must_use]
    pub const fn as_i16(self) -> i16 {
        match self {
            Self::V1 => 1,
        }
    }
}

impl fmt::Display for ApiTokenVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.as_i16())
    }
}

impl TryFrom<i16> for ApiTokenVersion {
    type Error = ApiTokenError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::V1),
            _ => Err(ApiTokenError::UnsupportedVersion),
        }
    }
}

impl From<ApiTokenVersion> for i16 {
    fn from(version: ApiTokenVersion) -> Self {
        version.as_i16()
    }
}

/// A parsed or freshly generated bearer token.
pub struct BearerToken {
    token_uuid: Uuid,
    version: ApiTokenVersion,
    secret: Zeroizing<[u8; SECRET_LEN]>,
}

impl BearerToken {
    /// New v1 token with a random secret.
    #[must_use]
    pub fn generate() -> Self {
        let mut secret = Zeroizing::new([0_u8; SECRET_LEN]);

        OsRng.fill_bytes(secret.as_mut_slice());

        Self {
            token_uuid: Uuid::now_v7(),
            version: ApiTokenVersion::V1,
            secret,
        }
    }

    #[must_use]
    pub const fn token_uuid(&self) -> Uuid {
        self.token_uuid
    }

    #[must_use]
    pub const fn version(&self) -> ApiTokenVersion {
        self.version
    }

    /// The full token string, shown to the holder exactly once.
    #[must_use]
    pub fn expose(&self) -> String {
        format!(
            "{PREFIX}_{}_{}.{}",
            self.version,
            self.token_uuid.simple(),
            self.secret_hex().as_str()
        )
    }

    /// HMAC input: `{token uuid}:{version}:{user uuid}:{secret hex}`.
    ///
    /// The owning user is part of the input so a verifier only matches the
    /// row it was issued for.
    #[must_use]
    pub fn verifier_input(&self, user: UserUuid) -> Zeroizing<Vec<u8>> {
        let input = format!(
            "{}:{}:{}:{}",
            self.token_uuid.simple(),
            self.version.as_i16(),
            user.into_uuid().simple(),
            self.secret_hex().as_str(),
        );

        Zeroizing::new(input.into_bytes())
    }

    fn secret_hex(&self) -> Zeroizing<String> {
        let mut hex = Zeroizing::new(String::with_capacity(SECRET_LEN * 2));

        for byte in self.secret.iter() {
            // Writing to a String cannot fail.
            let _ = write!(hex, "{byte:02x}");
        }

        hex
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerToken")
            .field("token_uuid", &self.token_uuid)
            .field("version", &self.version)
            .field("secret", &"**redacted**")
            .finish()
    }
}

impl FromStr for BearerToken {
    type Err = ApiTokenError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let (head, secret_hex) = token.split_once('.').ok_or(ApiTokenError::InvalidFormat)?;

        let Some((PREFIX, rest)) = head.split_once('_') else {
            return Err(ApiTokenError::InvalidFormat);
        };

        let (version, token_uuid) = rest.split_once('_').ok_or(ApiTokenError::InvalidFormat)?;

        let version = match version {
            "v1" => ApiTokenVersion::V1,
            _ => return Err(ApiTokenError::UnsupportedVersion),
        };

        let token_uuid = Uuid::try_parse(token_uuid)
            .ok()
            .ok_or(ApiTokenError::InvalidFormat)?;

        Ok(Self {
            token_uuid,
            version,
            secret: decode_secret(secret_hex).ok_or(ApiTokenError::InvalidSecretEncoding)?,
        })
    }
}

fn decode_secret(hex: &str) -> Option<Zeroizing<[u8; SECRET_LEN]>> {
    if hex.len() != SECRET_LEN * 2 || !hex.bytes().all(|byte| byte.is_ascii_hexdigit()) {
        return None;
    }

    let mut secret = Zeroizing::new([0_u8; SECRET_LEN]);

    for (byte, pair) in secret.iter_mut().zip(hex.as_bytes().chunks_exact(2)) {
        let pair = std::str::from_utf8(pair).ok()?;

        *byte = u8::from_str_radix(pair, 16).ok()?;
    }

    Some(secret)
}
