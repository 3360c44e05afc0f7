// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::error;

use giftcard_client::api::{ApiOutcome, ApiResponse, GiftCardApi};
use giftcard_client::config::{AuthMode, ClientConfig};
use giftcard_client::error::{ClientError, ClientResult};
use giftcard_client::http::RequestClient;
use giftcard_client::logging::init_logging;
use giftcard_client::models::{
    ClaimGiftCardRequest, CreateGiftCardRequest, ProfileUpdate, SetSecretRequest,
    TransferGiftCardRequest, WalletAddress,
};
use giftcard_client::session::{CredentialIssuer, SessionStore};
use giftcard_client::storage::{LocalDatabase, SessionStorage};
use giftcard_client::wallet::{
    BrowserHost, InjectionSurface, ProviderInfo, RpcProvider, TerminalHost, WalletConnector,
    WalletKind,
};

#[derive(Debug, Parser)]
#[command(name = "giftcard", version, about = "Relational gift-card client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start a session for an address without a wallet prompt.
    Login {
        #[arg(long)]
        address: String,
    },
    /// Connect through a wallet reachable at WALLET_RPC_URL.
    Connect {
        #[arg(long, default_value = "metamask")]
        wallet: String,
    },
    Logout,
    /// Print the stored session.
    Whoami,
    Profile {
        #[arg(long)]
        address: Option<String>,
    },
    UpdateProfile {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        bio: Option<String>,
        #[arg(long)]
        avatar_url: Option<String>,
    },
    Inventory {
        #[arg(long)]
        address: Option<String>,
    },
    Activity {
        #[arg(long)]
        address: Option<String>,
    },
    /// Profile, inventory and activity in one call. Fails if any part fails.
    Dashboard {
        #[arg(long)]
        address: Option<String>,
    },
    Create {
        #[arg(long)]
        amount: String,
        #[arg(long, default_value = "USDC")]
        currency: String,
        #[arg(long)]
        recipient: Option<String>,
        #[arg(long)]
        message: Option<String>,
        #[arg(long)]
        secret: Option<String>,
    },
    Claim {
        id: String,
        #[arg(long)]
        secret: Option<String>,
    },
    Transfer {
        id: String,
        #[arg(long)]
        to: String,
    },
    SetSecret {
        id: String,
        #[arg(long)]
        secret: String,
    },
}

struct App {
    config: ClientConfig,
    host: Arc<dyn BrowserHost>,
    session: Arc<SessionStore>,
    api: GiftCardApi,
}

impl App {
    fn build(config: ClientConfig) -> ClientResult<Self> {
        let storage: Arc<dyn SessionStorage> = Arc::new(LocalDatabase::open(&config.session_db)?);
        let host: Arc<dyn BrowserHost> = Arc::new(TerminalHost);

        let issuer = match config.auth_mode {
            AuthMode::Derived => CredentialIssuer::Derived,
            AuthMode::Backend => CredentialIssuer::Backend(RequestClient::from_config(&config)?),
        };
        let session = Arc::new(SessionStore::new(storage, issuer, host.clone()));

        let client = RequestClient::from_config(&config)?.with_credentials(session.clone());
        let api = GiftCardApi::new(client, config.fallback);

        Ok(Self {
            config,
            host,
            session,
            api,
        })
    }

    /// `explicit` if given, otherwise the connected address.
    fn address(&self, explicit: Option<&str>) -> ClientResult<WalletAddress> {
        match explicit {
            Some(raw) => WalletAddress::parse(raw),
            None => self.session.require_address(),
        }
    }

    fn connector(&self, kind: &WalletKind) -> ClientResult<WalletConnector> {
        let surface = match &self.config.wallet_rpc_url {
            Some(url) => {
                let provider = RpcProvider::new(url.clone(), provider_info(kind), self.config.http_timeout)
                    .map_err(|e| ClientError::Provider {
                        code: e.code,
                        message: e.message,
                    })?;
                InjectionSurface::Single(Arc::new(provider))
            }
            None => InjectionSurface::Absent,
        };

        let connector = WalletConnector::new(surface, self.host.clone(), self.session.clone());
        Ok(match &self.config.sign_in_message {
            Some(message) => connector.with_sign_in_message(message.clone()),
            None => connector,
        })
    }
}

/// Flags a desktop wallet behind `WALLET_RPC_URL` is taken to advertise.
fn provider_info(kind: &WalletKind) -> ProviderInfo {
    match kind {
        WalletKind::MetaMask => ProviderInfo {
            is_metamask: true,
            ..ProviderInfo::default()
        },
        WalletKind::CoinbaseWallet => ProviderInfo {
            is_coinbase_wallet: true,
            ..ProviderInfo::default()
        },
        other => ProviderInfo {
            name: Some(other.display_name().to_string()),
            id: Some(other.id().to_string()),
            ..ProviderInfo::default()
        },
    }
}

fn emit<T: Serialize>(envelope: &ApiResponse<T>) -> bool {
    match serde_json::to_string_pretty(envelope) {
        Ok(json) => println!("{json}"),
        Err(e) => error!(error = %e, "Failed to render response"),
    }
    envelope.success
}

fn emit_result<T: Serialize>(result: ClientResult<T>) -> bool {
    let outcome = match result {
        Ok(data) => ApiOutcome::Success(data),
        Err(e) => ApiOutcome::Failed(e),
    };
    emit(&outcome.into_envelope())
}

async fn run(app: &App, command: Command) -> ClientResult<bool> {
    let ok = match command {
        Command::Login { address } => {
            let address = WalletAddress::parse(&address)?;
            emit_result(app.session.connect(&address).await)
        }
        Command::Connect { wallet } => {
            let kind: WalletKind = wallet.parse().unwrap_or(WalletKind::Other(wallet));
            let connector = app.connector(&kind)?;
            emit_result(connector.connect(&kind).await.map(|c| c.session))
        }
        Command::Logout => emit_result(app.session.disconnect()),
        Command::Whoami => emit_result(Ok(app.session.current())),
        Command::Profile { address } => {
            let address = app.address(address.as_deref())?;
            emit(&app.api.profile(&address).await.into_envelope())
        }
        Command::UpdateProfile {
            username,
            bio,
            avatar_url,
        } => {
            let address = app.address(None)?;
            let update = ProfileUpdate {
                username,
                bio,
                avatar_url,
            };
            emit(&app.api.update_profile(&address, &update).await.into_envelope())
        }
        Command::Inventory { address } => {
            let address = app.address(address.as_deref())?;
            emit(&app.api.inventory(&address).await.into_envelope())
        }
        Command::Activity { address } => {
            let address = app.address(address.as_deref())?;
            emit(&app.api.activity(&address).await.into_envelope())
        }
        Command::Dashboard { address } => {
            let address = app.address(address.as_deref())?;
            emit_result(app.api.dashboard(&address).await)
        }
        Command::Create {
            amount,
            currency,
            recipient,
            message,
            secret,
        } => {
            let request = CreateGiftCardRequest {
                amount,
                currency,
                sender: app.address(None)?,
                recipient: recipient.as_deref().map(WalletAddress::parse).transpose()?,
                message,
                secret,
            };
            emit(&app.api.create_gift_card(&request).await.into_envelope())
        }
        Command::Claim { id, secret } => {
            let request = ClaimGiftCardRequest {
                wallet_address: app.address(None)?,
                secret,
            };
            emit(&app.api.claim_gift_card(&id, &request).await.into_envelope())
        }
        Command::Transfer { id, to } => {
            let request = TransferGiftCardRequest {
                from: app.address(None)?,
                to: WalletAddress::parse(&to)?,
            };
            emit(&app.api.transfer_gift_card(&id, &request).await.into_envelope())
        }
        Command::SetSecret { id, secret } => {
            let request = SetSecretRequest { secret };
            emit(&app.api.set_gift_card_secret(&id, &request).await.into_envelope())
        }
    };
    Ok(ok)
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let result = match ClientConfig::from_env().and_then(App::build) {
        Ok(app) => run(&app, cli.command).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!(error = %e, code = e.error_code(), "Command failed");
            emit(&ApiOutcome::<()>::Failed(e).into_envelope());
            ExitCode::FAILURE
        }
    }
}
