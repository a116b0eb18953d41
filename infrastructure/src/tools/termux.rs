//! Termux:API device tools (`termux_*`)
//!
//! Each tool wraps one `termux-*` binary from the `termux-api` package.
//! On a machine without it every call returns install guidance instead of
//! failing the turn.
//!
//! | Tool | Binary | Risk |
//! |------|--------|------|
//! | `termux_notification` | `termux-notification` | Moderate |
//! | `termux_vibrate` | `termux-vibrate` | Safe |
//! | `termux_torch` | `termux-torch` | Safe |
//! | `termux_battery` | `termux-battery-status` | Safe |
//! | `termux_clipboard_get` | `termux-clipboard-get` | Safe |
//! | `termux_clipboard_set` | `termux-clipboard-set` (stdin) | Moderate |
//! | `termux_tts` | `termux-tts-speak` (stdin) | Moderate |
//! | `termux_sms_send` | `termux-sms-send` | Dangerous |
//! | `termux_sms_list` | `termux-sms-list` | Moderate |
//! | `termux_camera_photo` | `termux-camera-photo` | Moderate |
//! | `termux_location` | `termux-location` | Moderate |
//! | `termux_share` | `termux-share` (stdin for text) | Moderate |
//! | `termux_toast` | `termux-toast` | Safe |
//! | `termux_wifi_info` | `termux-wifi-connectioninfo` | Safe |
//! | `termux_open_url` | `termux-open-url` | Moderate |
//! | `termux_volume` | `termux-volume` | Moderate |
//! | `termux_contact_list` | `termux-contact-list` | Safe |
//! | `termux_download` | `termux-download` | Moderate |

use super::file::expand_home;
use super::process::{self, ProcessError, ProcessJob};
use std::time::Duration;
use termagent_domain::tool::{
    entities::{RiskTier, ToolCall, ToolDefinition, ToolParameter},
    value_objects::{ToolError, ToolResult},
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const CLIPBOARD_TIMEOUT: Duration = Duration::from_secs(10);
const TTS_TIMEOUT: Duration = Duration::from_secs(60);
const SHARE_TIMEOUT: Duration = Duration::from_secs(15);

/// The Termux:API tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TermuxTool {
    Notification,
    Vibrate,
    Torch,
    Battery,
    ClipboardGet,
    ClipboardSet,
    Tts,
    SmsSend,
    SmsList,
    CameraPhoto,
    Location,
    Share,
    Toast,
    WifiInfo,
    OpenUrl,
    Volume,
    ContactList,
    Download,
}

/// A resolved `termux-*` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Invocation {
    program: &'static str,
    args: Vec<String>,
    stdin: Option<String>,
    timeout: Duration,
    /// Fixed reply for stdin-fed commands that succeed
    success_text: Option<&'static str>,
}

impl Invocation {
    fn new(program: &'static str) -> Self {
        Self {
            program,
            args: Vec::new(),
            stdin: None,
            timeout: DEFAULT_TIMEOUT,
            success_text: None,
        }
    }

    fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    fn piped(mut self, input: &str, timeout: Duration, success_text: &'static str) -> Self {
        self.stdin = Some(input.to_string());
        self.timeout = timeout;
        self.success_text = Some(success_text);
        self
    }
}

fn param(name: &str, description: &str, required: bool) -> ToolParameter {
    ToolParameter::new(name, description, required)
}

impl TermuxTool {
    pub const ALL: [TermuxTool; 18] = [
        TermuxTool::Notification,
        TermuxTool::Vibrate,
        TermuxTool::Torch,
        TermuxTool::Battery,
        TermuxTool::ClipboardGet,
        TermuxTool::ClipboardSet,
        TermuxTool::Tts,
        TermuxTool::SmsSend,
        TermuxTool::SmsList,
        TermuxTool::CameraPhoto,
        TermuxTool::Location,
        TermuxTool::Share,
        TermuxTool::Toast,
        TermuxTool::WifiInfo,
        TermuxTool::OpenUrl,
        TermuxTool::Volume,
        TermuxTool::ContactList,
        TermuxTool::Download,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TermuxTool::Notification => "termux_notification",
            TermuxTool::Vibrate => "termux_vibrate",
            TermuxTool::Torch => "termux_torch",
            TermuxTool::Battery => "termux_battery",
            TermuxTool::ClipboardGet => "termux_clipboard_get",
            TermuxTool::ClipboardSet => "termux_clipboard_set",
            TermuxTool::Tts => "termux_tts",
            TermuxTool::SmsSend => "termux_sms_send",
            TermuxTool::SmsList => "termux_sms_list",
            TermuxTool::CameraPhoto => "termux_camera_photo",
            TermuxTool::Location => "termux_location",
            TermuxTool::Share => "termux_share",
            TermuxTool::Toast => "termux_toast",
            TermuxTool::WifiInfo => "termux_wifi_info",
            TermuxTool::OpenUrl => "termux_open_url",
            TermuxTool::Volume => "termux_volume",
            TermuxTool::ContactList => "termux_contact_list",
            TermuxTool::Download => "termux_download",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    pub fn definition(&self) -> ToolDefinition {
        use RiskTier::{Dangerous, Moderate, Safe};

        let (description, tier, params): (&str, RiskTier, Vec<ToolParameter>) = match self {
            TermuxTool::Notification => (
                "Show an Android notification.",
                Moderate,
                vec![
                    param("title", "Notification title.", true),
                    param("content", "Notification body text.", true),
                    param("id", "Optional notification ID (to update existing).", false)
                        .with_type("integer"),
                ],
            ),
            TermuxTool::Vibrate => (
                "Vibrate the device.",
                Safe,
                vec![
                    param("duration_ms", "Vibration duration in milliseconds (default 1000).", false)
                        .with_type("integer"),
                ],
            ),
            TermuxTool::Torch => (
                "Turn the device flashlight/torch on or off.",
                Safe,
                vec![param("enabled", "True to turn on, false to turn off.", true).with_type("boolean")],
            ),
            TermuxTool::Battery => (
                "Get battery status (level, charging, temperature).",
                Safe,
                vec![],
            ),
            TermuxTool::ClipboardGet => ("Get the current clipboard content.", Safe, vec![]),
            TermuxTool::ClipboardSet => (
                "Set the device clipboard content.",
                Moderate,
                vec![param("text", "Text to copy to clipboard.", true)],
            ),
            TermuxTool::Tts => (
                "Speak text aloud using text-to-speech.",
                Moderate,
                vec![param("text", "Text to speak.", true)],
            ),
            TermuxTool::SmsSend => (
                "Send an SMS message. DANGEROUS: always asks for confirmation.",
                Dangerous,
                vec![
                    param("number", "Phone number to send SMS to.", true),
                    param("message", "SMS message body.", true),
                ],
            ),
            TermuxTool::SmsList => (
                "List recent SMS messages from inbox.",
                Moderate,
                vec![
                    param("limit", "Max number of messages to return (default 10).", false)
                        .with_type("integer"),
                    param(
                        "type",
                        "SMS type: 'inbox', 'sent', 'draft', 'all'. Default 'inbox'.",
                        false,
                    ),
                ],
            ),
            TermuxTool::CameraPhoto => (
                "Take a photo using the device camera.",
                Moderate,
                vec![
                    param("camera_id", "Camera ID (0=back, 1=front). Default 0.", false)
                        .with_type("integer"),
                    param("output_path", "Path to save the photo. Default 'photo.jpg'.", false)
                        .with_type("path"),
                ],
            ),
            TermuxTool::Location => (
                "Get the device GPS location (lat, lon, altitude).",
                Moderate,
                vec![param(
                    "provider",
                    "Location provider: 'gps', 'network', 'passive'. Default 'gps'.",
                    false,
                )],
            ),
            TermuxTool::Share => (
                "Share a file or text via Android's share intent.",
                Moderate,
                vec![
                    param("text", "Text to share (if sharing text).", false),
                    param("file", "File path to share (if sharing a file).", false).with_type("path"),
                ],
            ),
            TermuxTool::Toast => (
                "Show a short Android toast message.",
                Safe,
                vec![
                    param("text", "Toast message text.", true),
                    param("position", "Position: 'top', 'middle', 'bottom'. Default 'middle'.", false),
                ],
            ),
            TermuxTool::WifiInfo => ("Get current WiFi connection info.", Safe, vec![]),
            TermuxTool::OpenUrl => (
                "Open a URL in the default Android browser.",
                Moderate,
                vec![param("url", "URL to open.", true)],
            ),
            TermuxTool::Volume => (
                "Get or set device volume levels.",
                Moderate,
                vec![
                    param(
                        "stream",
                        "Audio stream: 'music', 'ring', 'alarm', 'notification'. Default 'music'.",
                        false,
                    ),
                    param(
                        "volume",
                        "Volume level to set (0-15). Omit to just read current volume.",
                        false,
                    )
                    .with_type("integer"),
                ],
            ),
            TermuxTool::ContactList => ("List contacts from the device.", Safe, vec![]),
            TermuxTool::Download => (
                "Download a file using the Android download manager.",
                Moderate,
                vec![
                    param("url", "URL to download.", true),
                    param("title", "Optional download notification title.", false),
                    param("description", "Optional download notification description.", false),
                ],
            ),
        };

        params.into_iter().fold(
            ToolDefinition::new(
                self.name(),
                format!("{} Requires termux-api.", description),
                tier,
            ),
            ToolDefinition::with_parameter,
        )
    }

    /// Map call arguments onto the binary's command line.
    fn invocation(&self, call: &ToolCall) -> Result<Invocation, ToolError> {
        let text = |key: &str| call.require_string(key).map_err(ToolError::invalid_argument);
        let optional = |key: &str| call.get_string(key).filter(|s| !s.is_empty());

        let inv = match self {
            TermuxTool::Notification => {
                let mut inv = Invocation::new("termux-notification")
                    .arg("--title")
                    .arg(text("title")?)
                    .arg("--content")
                    .arg(text("content")?);
                if let Some(id) = call.get_i64("id") {
                    inv = inv.arg("--id").arg(id.to_string());
                }
                inv
            }
            TermuxTool::Vibrate => {
                let ms = call.get_i64("duration_ms").filter(|d| *d > 0).unwrap_or(1000);
                Invocation::new("termux-vibrate").arg("-d").arg(ms.to_string())
            }
            TermuxTool::Torch => {
                let on = call.get_bool("enabled").unwrap_or(true);
                Invocation::new("termux-torch").arg(if on { "on" } else { "off" })
            }
            TermuxTool::Battery => Invocation::new("termux-battery-status"),
            TermuxTool::ClipboardGet => Invocation::new("termux-clipboard-get"),
            TermuxTool::ClipboardSet => Invocation::new("termux-clipboard-set").piped(
                text("text")?,
                CLIPBOARD_TIMEOUT,
                "Clipboard set successfully.",
            ),
            TermuxTool::Tts => Invocation::new("termux-tts-speak").piped(
                text("text")?,
                TTS_TIMEOUT,
                "Spoke text successfully.",
            ),
            TermuxTool::SmsSend => Invocation::new("termux-sms-send")
                .arg("-n")
                .arg(text("number")?)
                .arg(text("message")?),
            TermuxTool::SmsList => {
                let limit = call.get_i64("limit").filter(|l| *l > 0).unwrap_or(10);
                let mut inv = Invocation::new("termux-sms-list")
                    .arg("-l")
                    .arg(limit.to_string());
                if let Some(kind) = optional("type").filter(|t| *t != "inbox") {
                    inv = inv.arg("-t").arg(kind);
                }
                inv
            }
            TermuxTool::CameraPhoto => {
                let camera = call.get_i64("camera_id").unwrap_or(0);
                let output = optional("output_path").unwrap_or("photo.jpg");
                Invocation::new("termux-camera-photo")
                    .arg("-c")
                    .arg(camera.to_string())
                    .arg(expand_home(output).display().to_string())
            }
            TermuxTool::Location => Invocation::new("termux-location")
                .arg("-p")
                .arg(optional("provider").unwrap_or("gps")),
            TermuxTool::Share => match (optional("file"), optional("text")) {
                (Some(file), _) => {
                    Invocation::new("termux-share").arg(expand_home(file).display().to_string())
                }
                (None, Some(body)) => Invocation::new("termux-share")
                    .arg("-a")
                    .arg("send")
                    .piped(body, SHARE_TIMEOUT, "Shared successfully."),
                (None, None) => {
                    return Err(ToolError::invalid_argument(
                        "Provide either 'text' or 'file' to share.",
                    ));
                }
            },
            TermuxTool::Toast => Invocation::new("termux-toast")
                .arg("-g")
                .arg(optional("position").unwrap_or("middle"))
                .arg(text("text")?),
            TermuxTool::WifiInfo => Invocation::new("termux-wifi-connectioninfo"),
            TermuxTool::OpenUrl => Invocation::new("termux-open-url").arg(text("url")?),
            TermuxTool::Volume => match (optional("stream"), call.get_i64("volume")) {
                (Some(stream), Some(level)) => Invocation::new("termux-volume")
                    .arg(stream)
                    .arg(level.to_string()),
                _ => Invocation::new("termux-volume"),
            },
            TermuxTool::ContactList => Invocation::new("termux-contact-list"),
            TermuxTool::Download => {
                let mut inv = Invocation::new("termux-download").arg(text("url")?);
                if let Some(title) = optional("title") {
                    inv = inv.arg("-t").arg(title);
                }
                if let Some(description) = optional("description") {
                    inv = inv.arg("-d").arg(description);
                }
                inv
            }
        };
        Ok(inv)
    }

    /// Run the tool.
    pub async fn execute(&self, call: &ToolCall) -> ToolResult {
        let name = self.name();
        let inv = match self.invocation(call) {
            Ok(inv) => inv,
            Err(e) => return ToolResult::failure(name, e),
        };

        let mut job = ProcessJob::new(inv.program, inv.timeout).args(inv.args.iter().cloned());
        if let Some(input) = inv.stdin.as_deref() {
            job = job.stdin(input);
        }

        match process::run(job).await {
            Ok(out) => match inv.success_text {
                Some(done) if out.success() => ToolResult::success(name, done),
                Some(_) => ToolResult::failure(
                    name,
                    ToolError::execution_failed(out.stderr.trim().to_string()),
                ),
                None => ToolResult::success(name, render_output(&out)),
            },
            Err(ProcessError::NotFound(bin)) => ToolResult::failure(
                name,
                ToolError::not_found(format!(
                    "'{}' not found. Install termux-api:\n  pkg install termux-api\n\
                     Also install the Termux:API app from F-Droid.",
                    bin
                )),
            ),
            Err(ProcessError::Timeout(t)) => ToolResult::failure(
                name,
                ToolError::timeout(format!("Command timed out after {}s.", t.as_secs())),
            ),
            Err(e) => ToolResult::failure(name, ToolError::execution_failed(e.to_string())),
        }
    }
}

/// Trimmed stdout, then `STDERR:` and `EXIT CODE:` lines when relevant.
fn render_output(out: &process::ProcessOutput) -> String {
    let mut text = out.stdout.trim().to_string();
    if !out.stderr.trim().is_empty() {
        text.push_str(&format!("\nSTDERR: {}", out.stderr.trim()));
    }
    if !out.success() {
        text.push_str(&format!("\nEXIT CODE: {}", out.exit_code));
    }
    if text.is_empty() {
        "(no output)".to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip_and_prefix() {
        for tool in TermuxTool::ALL {
            assert!(tool.name().starts_with("termux_"));
            assert_eq!(TermuxTool::from_name(tool.name()), Some(tool));
            assert_eq!(tool.definition().name, tool.name());
        }
        assert_eq!(TermuxTool::from_name("termux_selfdestruct"), None);
    }

    #[test]
    fn test_risk_tiers() {
        let tier = |t: TermuxTool| t.definition().risk_tier;
        assert_eq!(tier(TermuxTool::SmsSend), RiskTier::Dangerous);
        assert_eq!(tier(TermuxTool::Battery), RiskTier::Safe);
        assert_eq!(tier(TermuxTool::Torch), RiskTier::Safe);
        assert_eq!(tier(TermuxTool::ClipboardSet), RiskTier::Moderate);
        assert_eq!(tier(TermuxTool::SmsList), RiskTier::Moderate);
        assert_eq!(tier(TermuxTool::ContactList), RiskTier::Safe);
    }

    #[test]
    fn test_notification_arguments() {
        let call = ToolCall::new("termux_notification")
            .with_arg("title", "Hi")
            .with_arg("content", "Body")
            .with_arg("id", 7);
        let inv = TermuxTool::Notification.invocation(&call).unwrap();
        assert_eq!(inv.program, "termux-notification");
        assert_eq!(inv.args, vec!["--title", "Hi", "--content", "Body", "--id", "7"]);
    }

    #[test]
    fn test_sms_list_defaults() {
        let inv = TermuxTool::SmsList
            .invocation(&ToolCall::new("termux_sms_list"))
            .unwrap();
        assert_eq!(inv.args, vec!["-l", "10"]);

        let call = ToolCall::new("termux_sms_list").with_arg("type", "sent");
        let inv = TermuxTool::SmsList.invocation(&call).unwrap();
        assert_eq!(inv.args, vec!["-l", "10", "-t", "sent"]);
    }

    #[test]
    fn test_volume_reads_without_level() {
        let call = ToolCall::new("termux_volume").with_arg("stream", "music");
        assert!(TermuxTool::Volume.invocation(&call).unwrap().args.is_empty());

        let call = call.with_arg("volume", 5);
        assert_eq!(
            TermuxTool::Volume.invocation(&call).unwrap().args,
            vec!["music", "5"]
        );
    }

    #[test]
    fn test_share_requires_text_or_file() {
        let err = TermuxTool::Share
            .invocation(&ToolCall::new("termux_share"))
            .unwrap_err();
        assert_eq!(err.message, "Provide either 'text' or 'file' to share.");

        let call = ToolCall::new("termux_share").with_arg("text", "hello");
        let inv = TermuxTool::Share.invocation(&call).unwrap();
        assert_eq!(inv.stdin.as_deref(), Some("hello"));
        assert_eq!(inv.success_text, Some("Shared successfully."));
    }

    #[test]
    fn test_render_output() {
        let out = process::ProcessOutput {
            stdout: "  {\"percentage\": 80}\n".into(),
            stderr: String::new(),
            exit_code: 0,
        };
        assert_eq!(render_output(&out), "{\"percentage\": 80}");

        let failed = process::ProcessOutput {
            stdout: String::new(),
            stderr: "no permission\n".into(),
            exit_code: 1,
        };
        assert_eq!(render_output(&failed), "\nSTDERR: no permission\nEXIT CODE: 1");

        let silent = process::ProcessOutput {
            stdout: String::new(),
            stderr: String::new(),
            exit_code: 0,
        };
        assert_eq!(render_output(&silent), "(no output)");
    }
}
