use mockito::{Server, ServerGuard};
use repolens::config::{Config, StructureErrorPolicy};

pub mod test_helpers {
    use super::*;

    pub async fn setup_test_server() -> ServerGuard {
        Server::new_async().await
    }

    /// Config pointed at the mock server, with a tame depth bound
    pub fn test_config(server: &ServerGuard) -> Config {
        Config {
            github_token: None,
            api_base: server.url(),
            max_tree_depth: 2,
            on_structure_error: StructureErrorPolicy::Fail,
        }
    }

    pub fn setup_test_logger() {
        repolens::logging::try_init("debug");
    }

    pub fn repo_json() -> String {
        r#"{
            "name": "demo",
            "full_name": "acme/demo",
            "description": "A demo repository",
            "language": "Python",
            "topics": ["cli", "automation"],
            "stargazers_count": 42,
            "forks_count": 7,
            "license": {"key": "mit", "name": "MIT License", "spdx_id": "MIT"},
            "default_branch": "main"
        }"#
        .to_string()
    }
}
