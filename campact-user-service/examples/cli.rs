use anyhow::{Context, bail};
use campact_user_service::{Account, ClientConfig, Session, TotpAuth};
use std::io::{BufRead, Write};
use tracing::info;

const DEFAULT_HOST: &str = "weact-adapter.staging.campact.de";
const SESSION_COOKIE_NAME: &str = "campact-staging-session";

fn main() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::builder()
        .parse_lossy("info,campact_user_service=debug,user_service_http=debug");
    tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(filter)
        .init();

    let mut lines = std::io::BufReader::new(std::io::stdin()).lines();
    let mut prompt = |message: &str| -> anyhow::Result<String> {
        let mut stdout = std::io::stdout();
        stdout.write_all(message.as_bytes())?;
        stdout.flush()?;
        let line = lines.next().context("Unexpected end of input")??;
        Ok(line.trim_end().to_owned())
    };

    let option = prompt("Which user service are you going to use?\n\t1) session\n\t2) account\n")?;

    let user = match std::env::var("TOTP_USER") {
        Ok(user) => user,
        Err(_) => prompt("Enter your TOTP user: ")?,
    };
    let secret = match std::env::var("TOTP_SECRET") {
        Ok(secret) => secret,
        Err(_) => prompt("Enter your TOTP secret: ")?,
    };
    let host = std::env::var("USER_SERVICE_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_owned());
    let config = ClientConfig::new(host).with_totp_auth(TotpAuth::new(user, secret));

    match option.as_str() {
        "1" => {
            let token = prompt("Session token: ")?;
            let session = campact_user_service::session(token, SESSION_COOKIE_NAME, config)?;
            print_session(&session)?;
            if session.exists()? && prompt("Destroy the session? [y/N] ")? == "y" {
                info!("Session destroyed: {}", session.destroy()?);
            }
        }
        "2" => {
            let user_id = prompt("User id (email address): ")?;
            let account = campact_user_service::account(user_id, config)?;
            print_account(&account)?;
        }
        _ => bail!("Invalid option '{option}'"),
    }

    info!("Goodbye");
    Ok(())
}

fn print_session(session: &Session) -> anyhow::Result<()> {
    println!("exists:                 {}", session.exists()?);
    println!("user id:                {:?}", session.user_id()?);
    println!("soft login session:     {}", session.has_soft_login_session()?);
    println!("hard login session:     {}", session.has_hard_login_session()?);
    Ok(())
}

fn print_account(account: &Account) -> anyhow::Result<()> {
    println!("exists:                 {}", account.exists()?);
    println!("name:                   {:?}", account.name()?);
    println!("email:                  {:?}", account.email()?);
    println!("address:                {:?}", account.address()?);
    println!("preferences:            {:?}", account.preferences()?);
    println!("donor info:             {:?}", account.donor_info()?);
    println!("newsletter:             {}", account.subscribed_to_newsletter()?);
    println!("allow prefill:          {}", account.allow_prefill()?);
    Ok(())
}
