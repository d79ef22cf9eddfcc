use reqwest::{Client, Url};
use serde::Deserialize;

use crate::config::UpstreamConfig;
use crate::error::AppError;
use crate::http::build_upstream_client;

/// `/users/{username}` 返回的资料（仅保留用到的字段）
#[derive(Debug, Deserialize)]
struct UserProfile {
    #[serde(default)]
    name: Option<String>,
    public_repos: u64,
    followers: u64,
    #[serde(default)]
    repos_url: Option<String>,
}

/// 仓库列表中的单条记录
#[derive(Debug, Deserialize)]
struct RepoEntry {
    #[serde(default)]
    stargazers_count: u64,
}

/// 单次请求内的资料统计
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileStats {
    pub display_name: String,
    pub repo_count: u64,
    pub star_total: u64,
    pub follower_count: u64,
}

/// 上游资料 API 客户端
#[derive(Debug, Clone)]
pub struct ProfileClient {
    http: Client,
    api_base_url: String,
    per_page: u32,
}

impl ProfileClient {
    pub fn new(http: Client, cfg: &UpstreamConfig) -> Self {
        Self {
            http,
            api_base_url: cfg.api_base_url.trim_end_matches('/').to_string(),
            per_page: cfg.per_page.clamp(1, 100),
        }
    }

    pub fn from_config(cfg: &UpstreamConfig) -> Result<Self, AppError> {
        let http = build_upstream_client(cfg)
            .map_err(|e| AppError::Internal(format!("HTTP Client 初始化失败: {e}")))?;
        Ok(Self::new(http, cfg))
    }

    /// 拉取资料并汇总星标数。
    ///
    /// 两次调用严格串行（仓库列表地址来自资料响应），不做重试；任一步失败直接返回错误。
    /// 仓库列表只取第一页，仓库数超过单页上限时星标总数会偏小。
    pub async fn fetch(&self, username: &str) -> Result<ProfileStats, AppError> {
        let profile_url = self.user_url(username, None)?;
        let resp = self.http.get(profile_url).send().await?;
        if !resp.status().is_success() {
            tracing::warn!(username, status = %resp.status(), "资料查询返回非成功状态");
            return Err(AppError::ProfileNotFound {
                username: username.to_string(),
            });
        }
        let profile: UserProfile = resp.json().await?;

        let repos_url = match profile.repos_url.as_deref() {
            Some(raw) => Url::parse(raw)
                .map_err(|e| AppError::Json(format!("repos_url 无效: {e}")))?,
            None => self.user_url(username, Some("repos"))?,
        };
        let resp = self
            .http
            .get(repos_url)
            .query(&[("per_page", self.per_page)])
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(AppError::Network(format!(
                "repository list request failed with status {}",
                resp.status()
            )));
        }
        let repos: Vec<RepoEntry> = resp.json().await?;

        if profile.public_repos > repos.len() as u64 {
            tracing::warn!(
                username,
                public_repos = profile.public_repos,
                returned = repos.len(),
                "仓库列表未分页拉取，星标总数可能不完整"
            );
        }
        let star_total = repos
            .iter()
            .fold(0u64, |acc, r| acc.saturating_add(r.stargazers_count));

        let display_name = profile
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| username.to_string());

        Ok(ProfileStats {
            display_name,
            repo_count: profile.public_repos,
            star_total,
            follower_count: profile.followers,
        })
    }

    /// `{api_base_url}/users/{username}[/{tail}]`，用户名按路径段转义。
    fn user_url(&self, username: &str, tail: Option<&str>) -> Result<Url, AppError> {
        let mut url = Url::parse(&self.api_base_url)
            .map_err(|e| AppError::Internal(format!("upstream.api_base_url 无效: {e}")))?;
        {
            let mut segs = url.path_segments_mut().map_err(|_| {
                AppError::Internal("upstream.api_base_url 不能作为基地址".to_string())
            })?;
            segs.pop_if_empty().push("users").push(username);
            if let Some(tail) = tail {
                segs.push(tail);
            }
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::ProfileClient;
    use crate::config::UpstreamConfig;

    fn client(base: &str) -> ProfileClient {
        let cfg = UpstreamConfig {
            api_base_url: base.to_string(),
            ..UpstreamConfig::default()
        };
        ProfileClient::from_config(&cfg).expect("client")
    }

    #[test]
    fn user_url_escapes_username_as_path_segment() {
        let c = client("https://api.github.com");
        let url = c.user_url("a/b?c", None).expect("url");
        assert_eq!(url.as_str(), "https://api.github.com/users/a%2Fb%3Fc");
    }

    #[test]
    fn user_url_keeps_base_path_prefix() {
        let c = client("http://127.0.0.1:9000/gh/");
        let url = c.user_url("octocat", Some("repos")).expect("url");
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/gh/users/octocat/repos");
    }
}
