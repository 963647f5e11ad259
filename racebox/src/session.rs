use std::{
    borrow::Cow,
    fmt,
    sync::{Arc, PoisonError, RwLock},
};

use log::{debug, info};

use crate::{
    constants::CONFIG_PACKET_LEN,
    device::DeviceKind,
    error::SessionError,
    packets::{ConfigurationRequest, TelemetryRecord},
    parser::{Decoder, DecoderStats},
};

/// Receives every record decoded by a [`Session`]
pub trait RecordHandler {
    fn handle(&mut self, _record: &TelemetryRecord) {}
}

/// Implement handler for simple callbacks / closures
impl<F: FnMut(&TelemetryRecord)> RecordHandler for F {
    fn handle(&mut self, record: &TelemetryRecord) {
        self(record)
    }
}

/// State of the transport link, as reported by whoever owns the transport
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Disconnecting,
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Disconnecting => "disconnecting",
        })
    }
}

/// Shared handle to the most recent record of a session.
///
/// Readers get either the previous or the new record, never a mix of both: a record
/// is built completely before it is swapped in.
#[derive(Debug, Clone, Default)]
pub struct LatestRecord(Arc<RwLock<Option<Arc<TelemetryRecord>>>>);

impl LatestRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<Arc<TelemetryRecord>> {
        // A panicking writer cannot leave a half-written record behind, the slot
        // only ever holds complete values
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set(&self, record: Arc<TelemetryRecord>) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = Some(record);
    }

    pub fn clear(&self) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// Outcome of [`Session::deliver`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Number of records decoded from the chunk, possibly zero
    Records(usize),
    /// The transport signalled that it has nothing for us
    NoData,
}

/// One connected device: a decoder, the latest record and the link state.
///
/// The transport calls [`Session::deliver`] from its notification callback and
/// [`Session::set_state`] on connection events. Every decoded record is handed to the
/// [`RecordHandler`] and published to [`LatestRecord`].
pub struct Session<H: RecordHandler> {
    kind: DeviceKind,
    state: LinkState,
    firmware: Option<String>,
    decoder: Decoder<Vec<u8>>,
    latest: LatestRecord,
    handler: H,
}

impl<H: RecordHandler> Session<H> {
    pub fn new(kind: DeviceKind, handler: H) -> Self {
        Self {
            kind,
            state: LinkState::Disconnected,
            firmware: None,
            decoder: Decoder::default(),
            latest: LatestRecord::new(),
            handler,
        }
    }

    /// Create a session for a device known by its advertised name
    pub fn for_device(name: &str, handler: H) -> Self {
        Self::new(DeviceKind::from_name(name), handler)
    }

    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn set_state(&mut self, state: LinkState) {
        if state == self.state {
            return;
        }
        info!("{}: link {} -> {}", self.kind, self.state, state);
        if state == LinkState::Disconnected {
            // The next link starts a fresh byte stream
            self.decoder.reset();
        }
        self.state = state;
    }

    /// Firmware revision string, as read from the device information service
    pub fn firmware(&self) -> Option<&str> {
        self.firmware.as_deref()
    }

    pub fn set_firmware(&mut self, raw: &[u8]) {
        let firmware = String::from_utf8_lossy(raw);
        if let Cow::Owned(_) = firmware {
            debug!("{}: firmware revision is not valid UTF-8", self.kind);
        }
        info!("{}: firmware {firmware}", self.kind);
        self.firmware = Some(firmware.into_owned());
    }

    /// Feed one transport notification. `None` is the transport's "no data" signal,
    /// it leaves the decoder untouched.
    pub fn deliver(&mut self, chunk: Option<&[u8]>) -> Delivery {
        let Some(chunk) = chunk else {
            debug!("{}: no data delivered", self.kind);
            return Delivery::NoData;
        };

        let mut count = 0;
        for frame in self.decoder.feed(chunk) {
            let record = Arc::new(frame.decode());
            self.latest.set(Arc::clone(&record));
            self.handler.handle(&record);
            count += 1;
        }
        Delivery::Records(count)
    }

    /// Publish a record that did not come from the byte stream, e.g. a simulated one
    pub fn publish(&mut self, record: TelemetryRecord) {
        let record = Arc::new(record);
        self.latest.set(Arc::clone(&record));
        self.handler.handle(&record);
    }

    /// Encode `request` for sending. Refused unless the link is up.
    pub fn configure(
        &self,
        request: ConfigurationRequest,
    ) -> Result<[u8; CONFIG_PACKET_LEN], SessionError> {
        if self.state != LinkState::Connected {
            return Err(SessionError::NotConnected { state: self.state });
        }
        debug!("{}: configuration {request:?}", self.kind);
        Ok(request.into_packet_bytes())
    }

    /// A handle to the latest record, clone it into any thread that needs to read
    pub fn latest(&self) -> LatestRecord {
        self.latest.clone()
    }

    pub fn stats(&self) -> DecoderStats {
        self.decoder.stats()
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn into_handler(self) -> H {
        self.handler
    }
}
