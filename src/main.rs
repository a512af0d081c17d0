use std::process::ExitCode;
use tokenrot::application_port::*;
use tokenrot::domain_model::Credentials;
use tokenrot::logger::*;
use tokenrot::server::*;
use tokenrot::settings::*;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let logger = Logger::new_bootstrap();

    let project_settings = parse_settings(cli.settings.as_deref())?;
    debug!(?project_settings);
    logger.reload_from_config(&LogConfig::from(&project_settings.log))?;

    let server = Server::try_new(&project_settings).await?;

    let exit = match cli.command {
        Command::Rotate {
            refresh_token,
            client_uid,
            client_secret,
            scope,
        } => {
            let credentials = client_uid
                .zip(client_secret)
                .map(|(uid, secret)| Credentials::new(uid, secret));
            let params = RotationParams {
                scope,
                scopes: None,
                refresh_token: Some(refresh_token),
            };

            match server.rotation_service.rotate(credentials, params).await {
                Ok(token) => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&TokenResponse::from(&token))?
                    );
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    if e.kind().is_none() {
                        error!(error = %e, "rotation failed");
                    }
                    println!("{}", serde_json::to_string_pretty(&e.to_response())?);
                    ExitCode::FAILURE
                }
            }
        }
        Command::HashSecret { secret } => match server.secret_hasher.hash_secret(&secret).await {
            Ok(stored) => {
                println!("{stored}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!(error = %e, "secret hashing failed");
                ExitCode::FAILURE
            }
        },
    };

    server.shutdown().await;
    Ok(exit)
}
