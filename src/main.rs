use std::sync::Arc;
use std::time::Duration;

use scholarpath::{
    authorize_url, bind_callback_listener, settings, wait_for_callback, ApiClient, AppResult,
    FileTokenStore, InstitutionFilter, RegisterRequest, ScholarshipFilter, TokenStore,
};

const BROWSER_LOGIN_TIMEOUT: Duration = Duration::from_secs(300);

const USAGE: &str = "\
ScholarPath companion client

Usage:
  scholarpath login <username> <password>   Sign in with credentials
  scholarpath login --browser               Sign in through the browser
  scholarpath register <email> <username> <password>
  scholarpath me                            Show the signed-in user
  scholarpath logout                        Sign out
  scholarpath institutions [search]         Browse institutions
  scholarpath scholarships [search]         Browse scholarships
  scholarpath save <id>                     Bookmark a scholarship
  scholarpath saved                         List bookmarked scholarships
";

#[tokio::main]
async fn main() {
    let _log_guard = scholarpath::logging::init();

    // Panics land in the disk log for post-mortem diagnosis.
    std::panic::set_hook(Box::new(|panic_info| {
        let location = panic_info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown".to_string());
        tracing::error!(location = %location, "PANIC: application panicked at {location}");
    }));

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(err) = run(args).await {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

async fn run(args: Vec<String>) -> AppResult<()> {
    let settings = settings::get();
    let store: Arc<FileTokenStore> = Arc::new(FileTokenStore::from_default_path()?);
    let client = ApiClient::from_settings(settings, store.clone());

    match args.first().map(String::as_str) {
        Some("login") if args.get(1).map(String::as_str) == Some("--browser") => {
            browser_login(settings, store, &client).await
        }
        Some("login") => {
            let (username, password) = two_args(&args, "login <username> <password>")?;
            let session = client.login(username, password).await?;
            store.set_token(&session.access_token);
            match session.user {
                Some(user) => println!("Signed in as {}", user.email),
                None => println!("Signed in"),
            }
            Ok(())
        }
        Some("register") => {
            let (Some(email), Some(username), Some(password)) =
                (args.get(1), args.get(2), args.get(3))
            else {
                return Err(
                    "SEC_INVALID_INPUT: usage: register <email> <username> <password>".into(),
                );
            };
            let user = client
                .register(&RegisterRequest {
                    email: email.clone(),
                    username: username.clone(),
                    password: password.clone(),
                    first_name: None,
                    last_name: None,
                })
                .await?;
            println!("Registered {}", user.email);
            Ok(())
        }
        Some("me") => {
            let user = client.current_user().await?;
            print_json(&user)
        }
        Some("logout") => {
            let result = client.logout().await;
            // Clearing never waits on the server reply.
            store.clear_token();
            if let Err(err) = result {
                tracing::warn!("server-side logout failed: {err}");
            }
            println!("Signed out");
            Ok(())
        }
        Some("institutions") => {
            let filter = InstitutionFilter {
                search: args.get(1).cloned(),
                ..Default::default()
            };
            print_json(&client.institutions(&filter).await?)
        }
        Some("scholarships") => {
            let filter = ScholarshipFilter {
                search: args.get(1).cloned(),
                ..Default::default()
            };
            print_json(&client.scholarships(&filter).await?)
        }
        Some("save") => {
            let id = args
                .get(1)
                .and_then(|raw| raw.parse::<i64>().ok())
                .ok_or_else(|| "SEC_INVALID_INPUT: usage: save <id>".to_string())?;
            client.save_scholarship(id).await?;
            println!("Saved scholarship {id}");
            Ok(())
        }
        Some("saved") => print_json(&client.saved_scholarships().await?),
        _ => {
            print!("{USAGE}");
            Ok(())
        }
    }
}

async fn browser_login(
    settings: &scholarpath::ClientSettings,
    store: Arc<FileTokenStore>,
    client: &ApiClient,
) -> AppResult<()> {
    let listener = bind_callback_listener(settings.callback_port).await?;
    let url = authorize_url(settings, listener.port())?;
    println!("Open this URL to sign in:\n\n  {url}\n");

    let outcome =
        wait_for_callback(listener, store.as_ref(), &settings.home_url, BROWSER_LOGIN_TIMEOUT)
            .await?;
    if !outcome.is_authenticated() {
        return Err("API_ERROR: browser sign-in failed".into());
    }

    let user = client.current_user().await?;
    println!("Signed in as {}", user.email);
    Ok(())
}

fn two_args<'a>(args: &'a [String], usage: &str) -> AppResult<(&'a str, &'a str)> {
    match (args.get(1), args.get(2)) {
        (Some(a), Some(b)) => Ok((a.as_str(), b.as_str())),
        _ => Err(format!("SEC_INVALID_INPUT: usage: {usage}").into()),
    }
}

fn print_json(value: &impl serde::Serialize) -> AppResult<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| format!("SYSTEM_ERROR: failed to render output: {e}"))?;
    println!("{rendered}");
    Ok(())
}
