//! SSH transport.
//!
//! One authenticated connection per switch; every scrape opens its own shell
//! channel on it with a `vt100` pseudo terminal.

use std::sync::Arc;

use async_trait::async_trait;
use russh::client::{self, Handle, Msg};
use russh::{Channel, ChannelMsg, Disconnect};
use russh_keys::key::PublicKey;
use tracing::{debug, trace};

use mcastmap_common::config::Config;

use crate::scraper::Connector;
use crate::session::{CommandChannel, SessionError, SessionKind};

const TERM_TYPE: &str = "vt100";
const TERM_COLUMNS: u32 = 80;
const COMMAND_TERMINATOR: &str = "\n";

impl SessionKind {
    /// Terminal height requested for the session.
    ///
    /// The mroute table is long; a terminal this tall keeps the switch from
    /// paging it and waiting for a keypress.
    pub fn terminal_rows(self) -> u32 {
        match self {
            SessionKind::Mroute => 10_000_000,
            SessionKind::Lldp => 50,
            SessionKind::Version => 100,
        }
    }
}

struct SwitchClient;

#[async_trait]
impl client::Handler for SwitchClient {
    type Error = russh::Error;

    // Switches are reached on a management network by address; their host
    // keys are not pinned.
    async fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> Result<bool, Self::Error> {
        debug!(fingerprint = %server_public_key.fingerprint(), "switch host key");
        Ok(true)
    }
}

pub struct SshConnector {
    handle: Handle<SwitchClient>,
}

impl SshConnector {
    pub async fn connect(cfg: &Config) -> Result<Self, SessionError> {
        let config = Arc::new(client::Config::default());
        let mut handle: Handle<SwitchClient> =
            client::connect(config, (cfg.addr.as_str(), cfg.ssh_port), SwitchClient)
                .await
                .map_err(|source| SessionError::Connect {
                    addr: format!("{}:{}", cfg.addr, cfg.ssh_port),
                    source,
                })?;

        let accepted: bool = handle
            .authenticate_password(cfg.user.as_str(), cfg.password.as_str())
            .await?;
        if !accepted {
            return Err(SessionError::Authentication {
                user: cfg.user.clone(),
            });
        }

        debug!(addr = %cfg.addr, user = %cfg.user, "ssh connection established");
        Ok(Self { handle })
    }

    pub async fn close(&self) -> Result<(), SessionError> {
        self.handle
            .disconnect(Disconnect::ByApplication, "", "English")
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Connector for SshConnector {
    type Channel = SshChannel;

    async fn open(&self, kind: SessionKind) -> Result<SshChannel, SessionError> {
        let channel: Channel<Msg> = self.handle.channel_open_session().await?;
        channel
            .request_pty(false, TERM_TYPE, TERM_COLUMNS, kind.terminal_rows(), 0, 0, &[])
            .await?;
        channel.request_shell(false).await?;
        Ok(SshChannel {
            channel,
            partial: Vec::new(),
        })
    }
}

pub struct SshChannel {
    channel: Channel<Msg>,
    /// Trailing bytes of a UTF-8 character split across two packets.
    partial: Vec<u8>,
}

impl SshChannel {
    fn decode(&mut self, data: &[u8]) -> String {
        decode_utf8(&mut self.partial, data)
    }
}

/// Decodes `data` appended to the carried-over bytes in `partial`. An
/// incomplete character at the end stays in `partial` for the next packet;
/// invalid bytes are replaced.
fn decode_utf8(partial: &mut Vec<u8>, data: &[u8]) -> String {
    partial.extend_from_slice(data);
    let valid: usize = match std::str::from_utf8(partial) {
        Ok(_) => partial.len(),
        Err(e) if e.error_len().is_none() => e.valid_up_to(),
        Err(_) => partial.len(),
    };
    let rest: Vec<u8> = partial.split_off(valid);
    let text: String = String::from_utf8_lossy(partial).into_owned();
    *partial = rest;
    text
}

#[async_trait]
impl CommandChannel for SshChannel {
    async fn send(&mut self, command: &str) -> Result<(), SessionError> {
        let line: String = format!("{command}{COMMAND_TERMINATOR}");
        self.channel.data(line.as_bytes()).await?;
        Ok(())
    }

    async fn recv(&mut self) -> Result<Option<String>, SessionError> {
        loop {
            match self.channel.wait().await {
                Some(ChannelMsg::Data { data }) => return Ok(Some(self.decode(&data))),
                Some(ChannelMsg::ExtendedData { data, .. }) => return Ok(Some(self.decode(&data))),
                Some(ChannelMsg::Eof | ChannelMsg::Close) | None => return Ok(None),
                Some(other) => trace!(?other, "ignoring channel message"),
            }
        }
    }
}
