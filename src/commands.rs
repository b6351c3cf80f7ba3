//! CLI Command Handlers
//!
//! Each handler takes CLI args, a catalog client and Output, and returns an
//! ExitCode.

use crate::api::{CatalogError, TmdbClient};
use crate::cli::{ExitCode, Output, SearchCmd};
use crate::config::ConfigError;
use crate::models::{ResultPage, ResultPageOutput};
use crate::query::Notice;

/// Exit code for a failed catalog call
pub fn catalog_exit_code(err: &CatalogError) -> ExitCode {
    match err {
        CatalogError::Network(_) => ExitCode::NetworkError,
        CatalogError::Api { .. } => ExitCode::ApiError,
        CatalogError::InvalidResponse(_) => ExitCode::Error,
    }
}

/// Report a fatal configuration problem
pub fn config_failure(err: &ConfigError, output: &Output) -> ExitCode {
    output.error(err.to_string(), ExitCode::ConfigError)
}

// =============================================================================
// Search Command
// =============================================================================

pub async fn search_cmd(cmd: SearchCmd, client: &TmdbClient, output: &Output) -> ExitCode {
    let query = cmd.query.trim();
    if query.is_empty() {
        return output.error("Search query must not be empty", ExitCode::InvalidArgs);
    }

    output.info(format!("Searching for: {} (page {})", query, cmd.page));

    let page = match client.search(query, cmd.page).await {
        Ok(page) => page,
        Err(e) => return output.error(e.user_message(), catalog_exit_code(&e)),
    };

    if page.is_empty() {
        return output.error(Notice::NoResults.message(), ExitCode::NoResults);
    }

    if output.json {
        if let Err(e) = output.print(ResultPageOutput::from(&page)) {
            return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
        }
    } else {
        print_page(&page, output);
    }
    ExitCode::Success
}

fn print_page(page: &ResultPage, output: &Output) {
    for movie in &page.movies {
        output.line(format!("{:>8}  {}", movie.id, movie));
    }
    output.info(format!(
        "Page {} of {} ({} results)",
        page.page, page.total_pages, page.total_results
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_exit_codes() {
        assert_eq!(
            catalog_exit_code(&CatalogError::Api {
                status: 401,
                message: "Invalid API key".into()
            }),
            ExitCode::ApiError
        );
        assert_eq!(
            catalog_exit_code(&CatalogError::InvalidResponse("eof".into())),
            ExitCode::Error
        );
    }

    #[test]
    fn test_config_failure_code() {
        let output = Output {
            json: false,
            quiet: true,
        };
        assert_eq!(
            config_failure(&ConfigError::MissingCredential, &output),
            ExitCode::ConfigError
        );
    }

    #[tokio::test]
    async fn test_blank_query_is_invalid() {
        let output = Output {
            json: true,
            quiet: true,
        };
        let client = TmdbClient::with_base_url("token", "http://127.0.0.1:1");
        let cmd = SearchCmd {
            query: "   ".into(),
            page: 1,
        };
        assert_eq!(
            search_cmd(cmd, &client, &output).await,
            ExitCode::InvalidArgs
        );
    }
}
