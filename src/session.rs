use log::{debug, error, info, trace};

use crate::concurrent;
use crate::concurrent::Reactor;
use crate::error::{Error, Result};
use crate::io::{Buffer, Connection, DEFAULT_BUFFER_CAPACITY};
use crate::protocol::codec::{fixed_header, message, DecodeOptions};
use crate::protocol::{FixedHeader, Message};

/// Produces the response for one inbound message.
///
/// Handlers receive every decoded request and answer with a future that
/// completes with the reply to write back. Returning a failed future (or
/// dropping the promise behind it) terminates the session.
pub trait MessageHandler: Send + 'static {
    fn handle(&mut self, message: Message) -> concurrent::Future<Message>;
}

impl<F> MessageHandler for F
where
    F: FnMut(Message) -> concurrent::Future<Message> + Send + 'static,
{
    fn handle(&mut self, message: Message) -> concurrent::Future<Message> {
        self(message)
    }
}

/// Per-session tuning knobs.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Capacity of the input and output buffers; bounds the largest
    /// message body the session accepts.
    pub buffer_capacity: usize,
    pub decode: DecodeOptions,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            decode: DecodeOptions::default(),
        }
    }
}

/// Per-connection MQTT session.
///
/// The session reads one request at a time from its connection, decodes it,
/// hands it to the handler, writes the handler's response back and loops.
/// Requests are strictly sequential: the next read does not start until the
/// previous response has been fully written.
pub struct MqttSession<C, H> {
    conn: C,
    handler: H,
    input: Buffer,
    output: Buffer,
    config: SessionConfig,
}

impl<C, H> MqttSession<C, H>
where
    C: Connection + Send + 'static,
    H: MessageHandler,
{
    pub fn new(conn: C, handler: H) -> Self {
        Self::with_config(conn, handler, SessionConfig::default())
    }

    pub fn with_config(conn: C, handler: H, config: SessionConfig) -> Self {
        let capacity = config.buffer_capacity;
        MqttSession {
            conn,
            handler,
            input: Buffer::with_capacity(capacity),
            output: Buffer::with_capacity(capacity),
            config,
        }
    }

    /// Posts the session's processing loop onto the reactor and returns
    /// immediately. The session then runs until a request fails or the
    /// peer disconnects.
    pub fn start(self, reactor: &Reactor) {
        debug!("Initializing a new MQTT session");
        reactor.execute(async move {
            let _ = self.run().await;
        });
    }

    /// Drives the request/response loop to completion. A clean disconnect
    /// between requests yields `Ok`; any mid-request failure is logged and
    /// returned.
    pub async fn run(mut self) -> Result<()> {
        loop {
            trace!("Expecting a new request");
            match self.process_request().await {
                Ok(()) => debug!("Request successfully processed"),
                Err(Error::Closed) => {
                    info!("Connection closed by peer, ending session");
                    let _ = self.conn.close().await;
                    return Ok(());
                }
                Err(e) => {
                    error!("Error while processing request: {}", e);
                    let _ = self.conn.close().await;
                    return Err(e);
                }
            }
        }
    }

    async fn process_request(&mut self) -> Result<()> {
        let header = self.read_header().await?;
        trace!("Fixed header received: {}", header);

        let request = self.read_body(&header).await?;
        debug!("Request message decoded: {}", request);

        let response = self.handler.handle(request).await?;
        debug!("Replying with message {}", response);

        self.write_response(&response).await
    }

    /// Reads the two-byte minimum fixed header, then keeps fetching one
    /// length byte at a time while the last one carries the continuation
    /// bit (up to the varint's four length bytes).
    async fn read_header(&mut self) -> Result<FixedHeader> {
        self.input.reset();
        self.conn.read(&mut self.input, FixedHeader::BASE_LEN).await?;
        let mut len_bytes = 1;
        loop {
            self.input.flip();
            let continued = self.input.last().map_or(false, |b| b & 0x80 != 0);
            if !continued || len_bytes >= 4 {
                break;
            }
            trace!("Fixed header is incomplete, reading one more length byte");
            self.input.reset();
            self.input.set_pos(len_bytes + 1);
            self.conn.read(&mut self.input, 1).await?;
            len_bytes += 1;
        }
        fixed_header::decode(&mut self.input)
    }

    async fn read_body(&mut self, header: &FixedHeader) -> Result<Message> {
        self.input.reset();
        self.conn.read(&mut self.input, header.remaining_len).await?;
        self.input.flip();

        let actual = self.input.remaining();
        if actual != header.remaining_len {
            return Err(Error::Session {
                expected: header.remaining_len,
                actual,
            });
        }
        message::decode_body(header, &mut self.input, &self.config.decode)
    }

    async fn write_response(&mut self, response: &Message) -> Result<()> {
        self.output.reset();
        message::encode(response, &mut self.output)?;
        self.output.flip();

        let nbytes = self.output.remaining();
        self.conn.write(&mut self.output, nbytes).await?;
        Ok(())
    }
}
