//! Async HTTP client wrapping the Kubo RPC API.

use std::{
  future::Future,
  path::{Path, PathBuf},
  pin::Pin,
  time::Duration,
};

use purrsist_core::content::{AddedEntry, ContentStore, KeyInfo, PublishedName};
use reqwest::{
  Client, Response,
  multipart::{Form, Part},
};
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
  Error, Result,
  walk::{collect_tree, safe_component},
};

/// Connection settings for the daemon's RPC API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
  /// e.g. `http://127.0.0.1:5001`
  pub api_url: String,
  /// Upper bound for a single RPC call. Remote pinning waits for the pin
  /// service, so this should be generous.
  pub timeout: Duration,
}

/// Async HTTP client for the Kubo RPC API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct IpfsClient {
  client: Client,
  config: ClientConfig,
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ApiErrorBody {
  message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct KeyListResponse {
  #[serde(default)]
  keys: Vec<KeyResponse>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct KeyResponse {
  name: String,
  id:   String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AddResponse {
  name: String,
  #[serde(default)]
  hash: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct NamePublishResponse {
  name:  String,
  value: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct NameResolveResponse {
  path: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LsResponse {
  #[serde(default)]
  objects: Vec<LsObject>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LsObject {
  #[serde(default)]
  links: Vec<LsLink>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LsLink {
  name:   String,
  #[serde(rename = "Type")]
  kind:   i32,
}

/// UnixFS node types that are listed as directories.
const UNIXFS_DIRECTORY: i32 = 1;
const UNIXFS_HAMT_SHARD: i32 = 5;
const UNIXFS_SYMLINK: i32 = 4;

// ─── Client ──────────────────────────────────────────────────────────────────

impl IpfsClient {
  pub fn new(config: ClientConfig) -> Result<Self> {
    let client = Client::builder().timeout(config.timeout).build()?;
    Ok(Self { client, config })
  }

  fn url(&self, endpoint: &str) -> String {
    format!(
      "{}/api/v0/{}",
      self.config.api_url.trim_end_matches('/'),
      endpoint
    )
  }

  /// `POST /api/v0/<endpoint>?<query>`. Every RPC call is a POST.
  async fn call(
    &self,
    endpoint: &'static str,
    query: &[(&str, &str)],
    form: Option<Form>,
  ) -> Result<Response> {
    let mut req = self.client.post(self.url(endpoint)).query(query);
    if let Some(form) = form {
      req = req.multipart(form);
    }
    let resp = req.send().await?;
    check(endpoint, resp).await
  }

  async fn call_json<T: DeserializeOwned>(
    &self,
    endpoint: &'static str,
    query: &[(&str, &str)],
  ) -> Result<T> {
    let bytes = self.call(endpoint, query, None).await?.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
  }

  /// Resolve an `/ipns/...` path to the `/ipfs/...` path it points at.
  /// Other paths are returned unchanged.
  async fn resolve(&self, path: &str) -> Result<String> {
    if !path.starts_with("/ipns/") {
      return Ok(path.to_string());
    }
    let resolved: NameResolveResponse = self
      .call_json("name/resolve", &[("arg", path), ("recursive", "true")])
      .await?;
    Ok(resolved.path)
  }

  async fn ls(&self, path: &str) -> Result<Vec<LsLink>> {
    let listing: LsResponse = self.call_json("ls", &[("arg", path)]).await?;
    Ok(listing.objects.into_iter().flat_map(|o| o.links).collect())
  }

  async fn cat(&self, path: &str) -> Result<Vec<u8>> {
    let bytes = self.call("cat", &[("arg", path)], None).await?.bytes().await?;
    Ok(bytes.to_vec())
  }

  /// Recursively copy the directory at `path` into `dest`.
  fn fetch_tree<'a>(
    &'a self,
    path: String,
    dest: PathBuf,
  ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
    Box::pin(async move {
      tokio::fs::create_dir_all(&dest).await?;

      for link in self.ls(&path).await? {
        let name = safe_component(&link.name)?;
        let child_path = format!("{path}/{name}");
        let child_dest = dest.join(name);

        match link.kind {
          UNIXFS_DIRECTORY | UNIXFS_HAMT_SHARD => {
            self.fetch_tree(child_path, child_dest).await?;
          }
          UNIXFS_SYMLINK => {
            tracing::debug!(path = %child_path, "skipping symlink");
          }
          _ => {
            let data = self.cat(&child_path).await?;
            tokio::fs::write(&child_dest, data).await?;
          }
        }
      }
      Ok(())
    })
  }
}

/// Turn a non-success response into [`Error::Api`], preferring the daemon's
/// own error message when the body carries one.
async fn check(endpoint: &'static str, resp: Response) -> Result<Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  let body = resp.text().await.unwrap_or_default();
  Err(Error::Api {
    endpoint,
    status: status.as_u16(),
    message: api_error_message(&body),
  })
}

fn api_error_message(body: &str) -> String {
  serde_json::from_str::<ApiErrorBody>(body)
    .map(|e| e.message)
    .unwrap_or_else(|_| body.trim().to_string())
}

/// Parse the newline-delimited JSON emitted by `add`.
fn parse_add_stream(body: &str) -> Result<Vec<AddedEntry>> {
  let mut entries = Vec::new();
  for line in body.lines().map(str::trim).filter(|l| !l.is_empty()) {
    let resp: AddResponse = serde_json::from_str(line)?;
    // Progress records carry no hash.
    if let Some(cid) = resp.hash {
      entries.push(AddedEntry { path: resp.name, cid });
    }
  }
  Ok(entries)
}

// ─── ContentStore impl ───────────────────────────────────────────────────────

impl ContentStore for IpfsClient {
  type Error = Error;

  async fn add_dir(&self, dir: &Path) -> Result<Vec<AddedEntry>> {
    let mut form = Form::new();
    for entry in collect_tree(dir).await? {
      let part = if entry.is_dir {
        Part::bytes(Vec::new())
          .file_name(entry.name)
          .mime_str("application/x-directory")?
      } else {
        Part::bytes(tokio::fs::read(&entry.path).await?)
          .file_name(entry.name)
          .mime_str("application/octet-stream")?
      };
      form = form.part("file", part);
    }

    let body = self
      .call(
        "add",
        &[("recursive", "true"), ("cid-version", "1")],
        Some(form),
      )
      .await?
      .text()
      .await?;

    let entries = parse_add_stream(&body)?;
    tracing::debug!(dir = %dir.display(), entries = entries.len(), "added directory");
    Ok(entries)
  }

  async fn get(&self, path: &str, dest: &Path) -> Result<()> {
    let resolved = self.resolve(path).await?;
    tracing::debug!(%path, %resolved, "fetching tree");
    self.fetch_tree(resolved, dest.to_path_buf()).await
  }

  async fn key_list(&self) -> Result<Vec<KeyInfo>> {
    let list: KeyListResponse = self.call_json("key/list", &[]).await?;
    Ok(
      list
        .keys
        .into_iter()
        .map(|k| KeyInfo { name: k.name, id: k.id })
        .collect(),
    )
  }

  async fn key_gen(&self, name: &str) -> Result<KeyInfo> {
    let key: KeyResponse = self
      .call_json("key/gen", &[("arg", name), ("type", "ed25519")])
      .await?;
    Ok(KeyInfo { name: key.name, id: key.id })
  }

  async fn name_publish(&self, path: &str, key: &str) -> Result<PublishedName> {
    let published: NamePublishResponse = self
      .call_json("name/publish", &[("arg", path), ("key", key)])
      .await?;
    Ok(PublishedName { name: published.name, value: published.value })
  }

  async fn pin_remote_rm(&self, service: &str, name: &str, force: bool) -> Result<()> {
    let force = if force { "true" } else { "false" };
    self
      .call(
        "pin/remote/rm",
        &[("service", service), ("name", name), ("force", force)],
        None,
      )
      .await?;
    Ok(())
  }

  async fn pin_remote_add(&self, service: &str, cid: &str, name: &str) -> Result<()> {
    self
      .call(
        "pin/remote/add",
        &[("arg", cid), ("service", service), ("name", name)],
        None,
      )
      .await?;
    Ok(())
  }
}
