//! Translate the daemon's API multiaddr into an HTTP base URL.

use crate::{Error, Result};

/// Convert an API multiaddr such as `/dns4/localhost/tcp/5001` into
/// `http://localhost:5001`.
///
/// Supported: `/ip4`, `/ip6`, `/dns`, `/dns4`, `/dns6` followed by
/// `/tcp/<port>` and an optional `/http` or `/https` suffix.
pub fn api_url_from_multiaddr(maddr: &str) -> Result<String> {
  let invalid = || Error::InvalidMultiaddr(maddr.to_string());

  let parts: Vec<&str> = maddr.trim().trim_start_matches('/').split('/').collect();
  let [proto, host, "tcp", port, rest @ ..] = parts.as_slice() else {
    return Err(invalid());
  };

  if host.is_empty() || port.parse::<u16>().is_err() {
    return Err(invalid());
  }

  let scheme = match rest {
    [] | ["http"] => "http",
    ["https"] | ["tls", "http"] => "https",
    _ => return Err(invalid()),
  };

  match *proto {
    "ip6" => Ok(format!("{scheme}://[{host}]:{port}")),
    "ip4" | "dns" | "dns4" | "dns6" => Ok(format!("{scheme}://{host}:{port}")),
    _ => Err(invalid()),
  }
}
