//! Device and event records as the CLI presents them.
//!
//! The API payloads are loosely typed. Records are extracted best-effort:
//! a field that is missing or has an unexpected type takes its zero value
//! instead of failing the whole record.

use crate::envelope::lenient;
use crate::format::{pad, CsvRecordProducer, JsonProducer, TableProducer};
use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const DEVICE_LIST_RULE_WIDTH: usize = 112;
const EVENT_LIST_RULE_WIDTH: usize = 98;
const DETAILS_RULE_WIDTH: usize = 30;

pub const NO_DEVICES_FOUND: &str = "No devices found.";
pub const NO_EVENTS_FOUND: &str = "No events found in the specified time period.";

/// Bird name used when the event carries no bird classification.
pub const UNIDENTIFIED_BIRD: &str = "Unidentified";

/// A camera registered to the account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    #[serde(default, deserialize_with = "lenient::string")]
    pub serial_number: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub model_no: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub device_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub network_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub ip: String,
    #[serde(default, deserialize_with = "lenient::int")]
    pub battery_level: i64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub location_name: String,
    #[serde(default, deserialize_with = "lenient::int")]
    pub signal_strength: i64,
    #[serde(default, deserialize_with = "lenient::int")]
    pub wifi_channel: i64,
    #[serde(default, deserialize_with = "lenient::int")]
    pub is_charging: i64,
    #[serde(default, deserialize_with = "lenient::int")]
    pub charging_mode: i64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub mac_address: String,
}

impl Device {
    pub fn from_object(object: &Map<String, Value>) -> Device {
        // every field is lenient, so only a non-object could fail here
        serde_json::from_value(Value::Object(object.clone())).unwrap_or_default()
    }

    pub fn is_charging(&self) -> bool {
        self.is_charging > 0
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

impl CsvRecordProducer for Device {
    fn csv_header() -> Vec<String> {
        [
            "SERIAL_NUMBER",
            "MODEL_NO",
            "DEVICE_NAME",
            "NETWORK_NAME",
            "IP",
            "BATTERY_LEVEL",
            "LOCATION_NAME",
            "SIGNAL_STRENGTH",
            "WIFI_CHANNEL",
            "IS_CHARGING",
            "CHARGING_MODE",
            "MAC_ADDRESS",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    fn as_csv_records(&self) -> Vec<Vec<String>> {
        vec![vec![
            self.serial_number.clone(),
            self.model_no.clone(),
            self.device_name.clone(),
            self.network_name.clone(),
            self.ip.clone(),
            self.battery_level.to_string(),
            self.location_name.clone(),
            self.signal_strength.to_string(),
            self.wifi_channel.to_string(),
            self.is_charging.to_string(),
            self.charging_mode.to_string(),
            self.mac_address.clone(),
        ]]
    }
}

impl JsonProducer for Device {}

impl TableProducer for Device {
    fn to_table(&self) -> String {
        [
            "Device Details:".to_string(),
            "-".repeat(DETAILS_RULE_WIDTH),
            format!("Serial Number:   {}", self.serial_number),
            format!("Model Number:    {}", self.model_no),
            format!("Device Name:     {}", self.device_name),
            format!("Network Name:    {}", self.network_name),
            format!("IP Address:      {}", self.ip),
            format!("Battery Level:   {}%", self.battery_level),
            format!("Location:        {}", self.location_name),
            format!("Signal Strength: {} dBm", self.signal_strength),
            format!("WiFi Channel:    {}", self.wifi_channel),
            format!("Is Charging:     {}", yes_no(self.is_charging())),
            format!("Charging Mode:   {}", self.charging_mode),
            format!("MAC Address:     {}", self.mac_address),
        ]
        .join("\n")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DeviceList {
    devices: Vec<Device>,
}

impl DeviceList {
    pub fn new(devices: Vec<Device>) -> DeviceList {
        DeviceList { devices }
    }

    /// Devices from a list payload's `data` member: `data.list`, keeping
    /// only object entries. Anything else is an empty list.
    pub fn from_data(data: Option<&Value>) -> DeviceList {
        DeviceList::new(
            list_objects(data)
                .into_iter()
                .map(Device::from_object)
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }
}

impl CsvRecordProducer for DeviceList {
    fn csv_header() -> Vec<String> {
        Device::csv_header()
    }

    fn as_csv_records(&self) -> Vec<Vec<String>> {
        self.devices
            .iter()
            .flat_map(|device| device.as_csv_records())
            .collect()
    }
}

impl JsonProducer for DeviceList {}

impl TableProducer for DeviceList {
    fn to_table(&self) -> String {
        if self.devices.is_empty() {
            return NO_DEVICES_FOUND.to_string();
        }

        let mut lines = vec![
            format!(
                "{} {} {} {} {} {}",
                pad("Serial Number", 36),
                pad("Model", 20),
                pad("Name", 20),
                pad("Network", 15),
                pad("IP", 15),
                pad("Battery", 5)
            ),
            "-".repeat(DEVICE_LIST_RULE_WIDTH),
        ];
        for device in &self.devices {
            lines.push(format!(
                "{} {} {} {} {} {}%",
                pad(&device.serial_number, 36),
                pad(&device.model_no, 20),
                pad(&device.device_name, 20),
                pad(&device.network_name, 15),
                pad(&device.ip, 15),
                device.battery_level
            ));
        }
        lines.join("\n")
    }
}

/// A key frame attached to an event. Kept for internal use only.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keyshot {
    #[serde(default, deserialize_with = "lenient::string")]
    pub image_url: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub message: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub object_category: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub sub_category_name: String,
}

/// An event as the API returns it, before presentation transforms.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEvent {
    #[serde(default, deserialize_with = "lenient::string")]
    trace_id: String,
    #[serde(default)]
    timestamp: Value,
    #[serde(default, deserialize_with = "lenient::string")]
    device_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    serial_number: String,
    #[serde(default, deserialize_with = "lenient::string")]
    admin_name: String,
    #[serde(default)]
    period: Value,
    #[serde(default, deserialize_with = "lenient::objects")]
    keyshots: Vec<Map<String, Value>>,
    #[serde(default, deserialize_with = "lenient::string")]
    image_url: String,
    #[serde(default, deserialize_with = "lenient::string")]
    video_url: String,
    #[serde(default, deserialize_with = "lenient::objects")]
    subcategory_info_list: Vec<Map<String, Value>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BirdInfo {
    #[serde(default, deserialize_with = "lenient::string")]
    object_type: String,
    #[serde(default, deserialize_with = "lenient::string")]
    object_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    bird_std_name: String,
    #[serde(default, deserialize_with = "lenient::float")]
    confidence: f64,
}

/// A motion or bird-sighting event.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub trace_id: String,
    pub timestamp: String,
    pub device_name: String,
    pub serial_number: String,
    pub admin_name: String,
    pub period: String,
    pub bird_name: String,
    pub bird_latin: String,
    pub bird_confidence: f64,
    pub key_shot_url: String,
    pub image_url: String,
    pub video_url: String,
    #[serde(skip)]
    pub(crate) keyshots: Vec<Keyshot>,
}

impl Event {
    pub fn from_object(object: &Map<String, Value>) -> Event {
        let raw: RawEvent =
            serde_json::from_value(Value::Object(object.clone())).unwrap_or_default();
        Event::from(raw)
    }

    pub fn keyshots(&self) -> &[Keyshot] {
        &self.keyshots
    }
}

impl From<RawEvent> for Event {
    fn from(raw: RawEvent) -> Self {
        let keyshots: Vec<Keyshot> = raw
            .keyshots
            .into_iter()
            .map(|object| serde_json::from_value(Value::Object(object)).unwrap_or_default())
            .collect();

        let bird = raw
            .subcategory_info_list
            .into_iter()
            .map(|object| {
                serde_json::from_value::<BirdInfo>(Value::Object(object)).unwrap_or_default()
            })
            .find(|info| info.object_type == "bird");

        let (bird_name, bird_latin, bird_confidence) = match bird {
            Some(info) => (info.object_name, info.bird_std_name, info.confidence),
            None => (String::new(), String::new(), 0.0),
        };

        Event {
            trace_id: raw.trace_id,
            timestamp: render_timestamp(&raw.timestamp),
            device_name: raw.device_name,
            serial_number: raw.serial_number,
            admin_name: raw.admin_name,
            period: render_period(&raw.period),
            bird_name: if bird_name.is_empty() {
                UNIDENTIFIED_BIRD.to_string()
            } else {
                bird_name
            },
            bird_latin,
            bird_confidence,
            key_shot_url: keyshots
                .first()
                .map(|keyshot| keyshot.image_url.clone())
                .unwrap_or_default(),
            image_url: raw.image_url,
            video_url: raw.video_url,
            keyshots,
        }
    }
}

/// Strings pass through; unix seconds become local `YYYY-MM-DD HH:MM:SS`.
fn render_timestamp(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => {
            let seconds = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64));
            seconds
                .and_then(|secs| Local.timestamp_opt(secs, 0).single())
                .map(|time| time.format(crate::time_utils::DISPLAY_FORMAT).to_string())
                .unwrap_or_default()
        }
        _ => String::new(),
    }
}

/// Strings pass through; seconds become `"{:.2}s"`.
fn render_period(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n
            .as_f64()
            .map(|seconds| format!("{:.2}s", seconds))
            .unwrap_or_default(),
        _ => String::new(),
    }
}

impl CsvRecordProducer for Event {
    fn csv_header() -> Vec<String> {
        [
            "TRACE_ID",
            "TIMESTAMP",
            "DEVICE_NAME",
            "SERIAL_NUMBER",
            "ADMIN_NAME",
            "PERIOD",
            "BIRD_NAME",
            "BIRD_LATIN",
            "BIRD_CONFIDENCE",
            "KEY_SHOT_URL",
            "IMAGE_URL",
            "VIDEO_URL",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    fn as_csv_records(&self) -> Vec<Vec<String>> {
        vec![vec![
            self.trace_id.clone(),
            self.timestamp.clone(),
            self.device_name.clone(),
            self.serial_number.clone(),
            self.admin_name.clone(),
            self.period.clone(),
            self.bird_name.clone(),
            self.bird_latin.clone(),
            self.bird_confidence.to_string(),
            self.key_shot_url.clone(),
            self.image_url.clone(),
            self.video_url.clone(),
        ]]
    }
}

impl JsonProducer for Event {}

impl TableProducer for Event {
    fn to_table(&self) -> String {
        let mut lines = vec![
            "Event Details:".to_string(),
            "-".repeat(DETAILS_RULE_WIDTH),
            format!("Trace ID:       {}", self.trace_id),
            format!("Timestamp:      {}", self.timestamp),
            format!("Device Name:    {}", self.device_name),
            format!("Serial Number:  {}", self.serial_number),
            format!("Admin Name:     {}", self.admin_name),
            format!("Period:         {}", self.period),
            format!("Bird Name:      {}", self.bird_name),
            format!("Bird Latin:     {}", self.bird_latin),
        ];
        if self.bird_confidence > 0.0 {
            lines.push(format!(
                "Confidence:     {:.2}%",
                self.bird_confidence * 100.0
            ));
        }
        lines.push(format!("KeyShot URL:    {}", self.key_shot_url));
        lines.push(format!("Image URL:      {}", self.image_url));
        lines.push(format!("Video URL:      {}", self.video_url));
        lines.join("\n")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EventList {
    events: Vec<Event>,
}

impl EventList {
    pub fn new(events: Vec<Event>) -> EventList {
        EventList { events }
    }

    /// Events from a list payload's `data` member: `data.list`, keeping
    /// only object entries. Anything else is an empty list.
    pub fn from_data(data: Option<&Value>) -> EventList {
        EventList::new(list_objects(data).into_iter().map(Event::from_object).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    pub fn filtered<P>(self, predicate: P) -> EventList
    where
        P: Fn(&Event) -> bool,
    {
        EventList::new(self.events.into_iter().filter(|e| predicate(e)).collect())
    }
}

impl From<Vec<Event>> for EventList {
    fn from(events: Vec<Event>) -> Self {
        EventList::new(events)
    }
}

impl CsvRecordProducer for EventList {
    fn csv_header() -> Vec<String> {
        Event::csv_header()
    }

    fn as_csv_records(&self) -> Vec<Vec<String>> {
        self.events
            .iter()
            .flat_map(|event| event.as_csv_records())
            .collect()
    }
}

impl JsonProducer for EventList {}

impl TableProducer for EventList {
    fn to_table(&self) -> String {
        if self.events.is_empty() {
            return NO_EVENTS_FOUND.to_string();
        }

        let mut lines = vec![
            format!(
                "{} {} {} {} {}",
                pad("Trace ID", 36),
                pad("Timestamp", 20),
                pad("Device Name", 25),
                pad("Bird Name", 25),
                pad("Bird Latin", 25)
            ),
            "-".repeat(EVENT_LIST_RULE_WIDTH),
        ];
        for event in &self.events {
            lines.push(format!(
                "{} {} {} {} {}",
                pad(&event.trace_id, 36),
                pad(&event.timestamp, 20),
                pad(&event.device_name, 25),
                pad(&event.bird_name, 25),
                pad(&event.bird_latin, 25)
            ));
        }
        lines.join("\n")
    }
}

fn list_objects(data: Option<&Value>) -> Vec<&Map<String, Value>> {
    data.and_then(|data| data.get("list"))
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_object).collect())
        .unwrap_or_default()
}
