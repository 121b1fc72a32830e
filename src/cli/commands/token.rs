use clap::Args;
use serde_json::json;
use uuid::Uuid;

use crate::auth::{generate_jwt, Claims};
use crate::cli::{utils::output_success, OutputFormat};
use crate::config;

/// Ten years
pub const MAX_TOKEN_HOURS: u64 = 24 * 365 * 10;

#[derive(Args)]
pub struct TokenArgs {
    #[arg(long, help = "Auth user id (the `sub` claim, matches user_profiles.user_id)")]
    pub user: Uuid,

    #[arg(
        long,
        value_parser = clap::value_parser!(u64).range(1..=MAX_TOKEN_HOURS),
        help = "Lifetime in hours (defaults to SECURITY_DEV_TOKEN_EXPIRY_HOURS)"
    )]
    pub hours: Option<u64>,

    #[arg(long, help = "Optional email claim")]
    pub email: Option<String>,
}

pub fn handle(args: TokenArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let hours = args.hours.unwrap_or(config::config().security.dev_token_expiry_hours);
    let mut claims = Claims::new(args.user, hours)?;
    if let Some(email) = args.email {
        claims = claims.with_email(email);
    }
    let expires_at = claims.exp;

    let token = generate_jwt(claims)?;

    match output_format {
        OutputFormat::Json => output_success(
            &output_format,
            "Token generated",
            Some(json!({ "token": token, "user_id": args.user, "expires_at": expires_at })),
        ),
        OutputFormat::Text => {
            println!("{}", token);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use crate::cli::{Cli, Commands};

    fn parse(hours: &str) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(["agencyctl", "token", "--user", "00000000-0000-0000-0000-000000000001", "--hours", hours])
    }

    #[test]
    fn hours_must_be_within_range() {
        assert!(parse("0").is_err());
        assert!(parse("87601").is_err());
        assert!(parse("18446744073709551615").is_err());

        let cli = parse("87600").unwrap();
        match cli.command {
            Commands::Token(args) => assert_eq!(args.hours, Some(super::MAX_TOKEN_HOURS)),
            _ => panic!("expected token command"),
        }
    }
}
