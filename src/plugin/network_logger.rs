use std::fmt::Write as _;
use std::ops::BitOr;
use std::sync::Arc;

use tracing::info;

use super::Plugin;
use crate::error::{MoyaError, MoyaResult};
use crate::request::RequestType;
use crate::response::Response;
use crate::target::TargetType;

const DEFAULT_LOGGER_ID: &str = "Moya_Logger";
const DEFAULT_DATE_FORMAT: &str = "%m/%d/%y, %-I:%M %p";
const UNREADABLE_DATA: &str = "## Cannot map data to String ##";

/// Which parts of an outgoing request are logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestLogOptions(u8);

impl RequestLogOptions {
    pub const METHOD: Self = Self(1);
    pub const BODY: Self = Self(2);
    pub const HEADERS: Self = Self(4);
    /// Replaces every other entry with a single cURL command.
    pub const FORMAT_AS_CURL: Self = Self(8);
    pub const VERBOSE: Self = Self(1 | 2 | 4);

    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl Default for RequestLogOptions {
    fn default() -> Self {
        Self(Self::METHOD.0 | Self::HEADERS.0)
    }
}

impl BitOr for RequestLogOptions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Which parts of a response are logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResponseLogOptions(u8);

impl ResponseLogOptions {
    pub const BODY: Self = Self(1);
    pub const VERBOSE: Self = Self::BODY;

    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for ResponseLogOptions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

type OutputFn = dyn Fn(&dyn TargetType, &[String]) + Send + Sync;
type DataFormatterFn = dyn Fn(&[u8]) -> String + Send + Sync;

/// Settings for [`NetworkLoggerPlugin`].
#[derive(Clone)]
pub struct LoggerConfiguration {
    pub logger_id: String,
    /// A `chrono` format string used for the entry timestamp.
    pub date_format: String,
    output: Arc<OutputFn>,
    request_data_formatter: Arc<DataFormatterFn>,
    response_data_formatter: Arc<DataFormatterFn>,
    pub request_options: RequestLogOptions,
    pub success_response_options: ResponseLogOptions,
    pub error_response_options: ResponseLogOptions,
}

impl Default for LoggerConfiguration {
    fn default() -> Self {
        Self {
            logger_id: DEFAULT_LOGGER_ID.to_owned(),
            date_format: DEFAULT_DATE_FORMAT.to_owned(),
            output: Arc::new(default_output),
            request_data_formatter: Arc::new(default_data_formatter),
            response_data_formatter: Arc::new(default_data_formatter),
            request_options: RequestLogOptions::default(),
            success_response_options: ResponseLogOptions::default(),
            error_response_options: ResponseLogOptions::default(),
        }
    }
}

impl LoggerConfiguration {
    /// Logs request bodies and response bodies too.
    #[must_use]
    pub fn verbose() -> Self {
        Self {
            request_options: RequestLogOptions::VERBOSE,
            success_response_options: ResponseLogOptions::VERBOSE,
            error_response_options: ResponseLogOptions::VERBOSE,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_request_options(mut self, options: RequestLogOptions) -> Self {
        self.request_options = options;
        self
    }

    #[must_use]
    pub fn with_output<F>(mut self, output: F) -> Self
    where
        F: Fn(&dyn TargetType, &[String]) + Send + Sync + 'static,
    {
        self.output = Arc::new(output);
        self
    }

    #[must_use]
    pub fn with_request_data_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&[u8]) -> String + Send + Sync + 'static,
    {
        self.request_data_formatter = Arc::new(formatter);
        self
    }

    #[must_use]
    pub fn with_response_data_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&[u8]) -> String + Send + Sync + 'static,
    {
        self.response_data_formatter = Arc::new(formatter);
        self
    }
}

fn default_output(target: &dyn TargetType, items: &[String]) {
    for item in items {
        info!(target_path = %target.path(), "{}", item);
    }
}

fn default_data_formatter(data: &[u8]) -> String {
    std::str::from_utf8(data).map_or_else(|_| UNREADABLE_DATA.to_owned(), ToOwned::to_owned)
}

/// Logs outgoing requests and incoming responses.
#[derive(Clone, Default)]
pub struct NetworkLoggerPlugin {
    configuration: LoggerConfiguration,
}

impl NetworkLoggerPlugin {
    #[must_use]
    pub const fn new(configuration: LoggerConfiguration) -> Self {
        Self { configuration }
    }

    #[must_use]
    pub const fn configuration(&self) -> &LoggerConfiguration {
        &self.configuration
    }

    fn entry(&self, identifier: &str, message: &str) -> String {
        let now = chrono::Local::now();
        let mut date = String::new();
        if write!(date, "{}", now.format(&self.configuration.date_format)).is_err() {
            date = now.to_rfc3339();
        }
        format!(
            "{}: [{}] {}: {}",
            self.configuration.logger_id, date, identifier, message
        )
    }

    fn request_entries(&self, request: &dyn RequestType) -> Vec<String> {
        let Some(http_request) = request.request() else {
            return vec![self.entry("Request", "(invalid request)")];
        };
        let options = self.configuration.request_options;
        let mut output = vec![self.entry("Request", http_request.url.as_str())];

        if options.contains(RequestLogOptions::HEADERS) {
            let mut all_headers = request.session_headers().clone();
            all_headers.extend(
                http_request
                    .headers()
                    .iter()
                    .map(|(key, value)| (key.clone(), value.clone())),
            );
            output.push(self.entry("Request Headers", &format!("{:?}", all_headers)));
        }
        if options.contains(RequestLogOptions::BODY)
            && let Some(body) = &http_request.body
        {
            let text = (self.configuration.request_data_formatter)(body);
            output.push(self.entry("Request Body", &text));
        }
        if options.contains(RequestLogOptions::METHOD) {
            output.push(self.entry("HTTP Request Method", http_request.method.as_str()));
        }
        output
    }

    fn response_entries(
        &self,
        response: &Response,
        target: &dyn TargetType,
        options: ResponseLogOptions,
    ) -> Vec<String> {
        let Some(head) = &response.response else {
            let message = format!("Received empty network response for {:?}.", target);
            return vec![self.entry("Response", &message)];
        };
        let url = head.url.as_ref().map_or("", |url| url.as_str());
        let mut output = vec![self.entry(
            "Response",
            &format!("{} {} {:?}", head.status, url, head.headers),
        )];
        if options.contains(ResponseLogOptions::BODY) {
            let text = (self.configuration.response_data_formatter)(&response.data);
            output.push(self.entry("Body", &text));
        }
        output
    }

    fn error_entries(&self, error: &MoyaError, target: &dyn TargetType) -> Vec<String> {
        if let Some(response) = error.response() {
            return self.response_entries(
                response,
                target,
                self.configuration.error_response_options,
            );
        }
        let message = format!("Error calling {:?} : {}", target, error);
        vec![self.entry("Error", &message)]
    }
}

impl Plugin for NetworkLoggerPlugin {
    fn will_send(&self, request: &dyn RequestType, target: &dyn TargetType) {
        let items = if self
            .configuration
            .request_options
            .contains(RequestLogOptions::FORMAT_AS_CURL)
        {
            vec![self.entry("Request", &request.curl_description())]
        } else {
            self.request_entries(request)
        };
        (self.configuration.output)(target, &items);
    }

    fn did_receive(&self, result: &MoyaResult<Response>, target: &dyn TargetType) {
        let items = match result {
            Ok(response) => self.response_entries(
                response,
                target,
                self.configuration.success_response_options,
            ),
            Err(error) => self.error_entries(error, target),
        };
        (self.configuration.output)(target, &items);
    }
}
