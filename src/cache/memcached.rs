//! Memcached Client Module
//!
//! Minimal memcached text-protocol client (`get` / `set`) over a pool of
//! servers. Each key is routed to one server by a stable hash, and each
//! operation uses its own short-lived connection.

use std::borrow::Cow;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use sha1::{Digest, Sha1};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::debug;

use crate::cache::{ResponseCache, MAX_KEY_LENGTH};
use crate::error::CacheError;

// == Key Encoding ==
/// Prefix marking a key that was replaced by its digest
const HASHED_KEY_PREFIX: &str = "sha1:";

/// Returns the key as sent on the wire.
///
/// Keys memcached would reject (too long, whitespace or control
/// characters) are replaced by `sha1:<hex digest>`. Keys already carrying
/// that prefix are hashed too, so a verbatim key never collides with a
/// hashed one.
pub fn wire_key(key: &str) -> Cow<'_, str> {
    let verbatim = !key.is_empty()
        && key.len() <= MAX_KEY_LENGTH
        && key.bytes().all(|b| b > b' ' && b != 0x7f)
        && !key.starts_with(HASHED_KEY_PREFIX);

    if verbatim {
        Cow::Borrowed(key)
    } else {
        let digest = hex::encode(Sha1::digest(key.as_bytes()));
        Cow::Owned(format!("{}{}", HASHED_KEY_PREFIX, digest))
    }
}

// == Memcached Cache ==
/// Memcached-backed response cache.
#[derive(Debug, Clone)]
pub struct MemcachedCache {
    /// Pool as `host:port` entries
    servers: Vec<String>,
    /// Upper bound for one whole operation (connect + request + reply)
    timeout: Duration,
}

impl MemcachedCache {
    /// Creates a client for the given pool.
    pub fn new(servers: Vec<String>, timeout: Duration) -> Result<Self, CacheError> {
        if servers.is_empty() {
            return Err(CacheError::NoServers);
        }
        Ok(Self { servers, timeout })
    }

    /// Picks the pool member responsible for `key`.
    pub fn server_for(&self, key: &str) -> &str {
        let hash = Sha1::digest(key.as_bytes());
        let bucket = u32::from_be_bytes([hash[0], hash[1], hash[2], hash[3]]) as usize;
        &self.servers[bucket % self.servers.len()]
    }

    async fn with_timeout<T>(
        &self,
        op: impl Future<Output = Result<T, CacheError>>,
    ) -> Result<T, CacheError> {
        tokio::time::timeout(self.timeout, op)
            .await
            .map_err(|_| CacheError::Timeout(self.timeout))?
    }
}

#[async_trait]
impl ResponseCache for MemcachedCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let key = wire_key(key);
        let server = self.server_for(&key);
        debug!(server, key = %key, "memcached get");
        self.with_timeout(get_from(server, &key)).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let key = wire_key(key);
        let server = self.server_for(&key);
        debug!(server, key = %key, bytes = value.len(), "memcached set");
        self.with_timeout(set_on(server, &key, value)).await
    }
}

// == Protocol ==
async fn get_from(server: &str, key: &str) -> Result<Option<String>, CacheError> {
    let mut conn = BufReader::new(TcpStream::connect(server).await?);
    conn.get_mut()
        .write_all(format!("get {}\r\n", key).as_bytes())
        .await?;

    let line = read_line(&mut conn).await?;
    if line == "END" {
        return Ok(None);
    }

    // VALUE <key> <flags> <bytes> [<cas unique>]
    let header = line
        .strip_prefix("VALUE ")
        .ok_or_else(|| unexpected_reply(&line))?;
    let length: usize = header
        .split(' ')
        .nth(2)
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| unexpected_reply(&line))?;

    let mut data = vec![0u8; length + 2];
    conn.read_exact(&mut data).await?;
    if !data.ends_with(b"\r\n") {
        return Err(CacheError::Protocol("value block not terminated by CRLF".into()));
    }
    data.truncate(length);

    let end = read_line(&mut conn).await?;
    if end != "END" {
        return Err(unexpected_reply(&end));
    }

    String::from_utf8(data)
        .map(Some)
        .map_err(|_| CacheError::Protocol("value is not valid UTF-8".into()))
}

async fn set_on(server: &str, key: &str, value: &str) -> Result<(), CacheError> {
    let mut conn = BufReader::new(TcpStream::connect(server).await?);

    // flags 0, exptime 0 (never expires)
    let mut request = format!("set {} 0 0 {}\r\n", key, value.len()).into_bytes();
    request.extend_from_slice(value.as_bytes());
    request.extend_from_slice(b"\r\n");
    conn.get_mut().write_all(&request).await?;

    let line = read_line(&mut conn).await?;
    if line == "STORED" {
        Ok(())
    } else {
        Err(unexpected_reply(&line))
    }
}

/// Reads one CRLF-terminated reply line, without the terminator.
async fn read_line(conn: &mut BufReader<TcpStream>) -> Result<String, CacheError> {
    let mut line = String::new();
    if conn.read_line(&mut line).await? == 0 {
        return Err(CacheError::Protocol("connection closed by server".into()));
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn unexpected_reply(line: &str) -> CacheError {
    CacheError::Protocol(format!("unexpected reply: {}", line))
}
