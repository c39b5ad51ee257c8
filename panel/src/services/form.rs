//! Intake form validation
//!
//! Turns an [`IntakeForm`] snapshot into a [`MailIntakeConfig`]. Rules run
//! in a fixed order and the first failure wins; only one problem is ever
//! reported at a time.

use crate::types::{
    ConnectionProbe, IntakeForm, MailIntakeConfig, ValidationError, DEFAULT_POLL_INTERVAL_SECS,
};

/// Check host and port, returning the parsed port
///
/// Shared by the save path and the connection test, which may run without a
/// prior save.
pub fn validate_target(host: &str, port: &str) -> Result<u16, ValidationError> {
    if host.trim().is_empty() {
        return Err(ValidationError::MissingHost);
    }

    let port = port.trim();
    if port.is_empty() {
        return Err(ValidationError::MissingPort);
    }

    parse_port(port)
}

fn parse_port(port: &str) -> Result<u16, ValidationError> {
    // Parse wide so that "65536" and "-1" are range errors, not overflow
    let value: i64 = port.parse().map_err(|_| ValidationError::InvalidPort)?;
    if !(1..=65535).contains(&value) {
        return Err(ValidationError::InvalidPort);
    }
    Ok(value as u16)
}

fn parse_poll_interval(raw: &str) -> Result<u64, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(DEFAULT_POLL_INTERVAL_SECS);
    }

    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ValidationError::InvalidPollInterval),
    }
}

/// Build the candidate configuration from a form snapshot
pub fn collect(form: &IntakeForm) -> Result<MailIntakeConfig, ValidationError> {
    let port = validate_target(&form.host, &form.port)?;
    let poll_interval_secs = parse_poll_interval(&form.poll_interval)?;

    Ok(MailIntakeConfig {
        host: form.host.clone(),
        port,
        username: form.username.clone(),
        password: form.password.clone(),
        enabled: form.enabled,
        tls: form.tls,
        ignore_cert_errors: form.ignore_cert_errors,
        folder: form.folder.clone(),
        poll_interval_secs,
        restrict_domain: form.restrict_domain.clone(),
        delete_reported_campaign_email: form.delete_reported_campaign_email,
        last_login_at: None,
    })
}

/// Build the connection test target from a form snapshot
///
/// Only the host/port rules apply here; the poll interval is irrelevant to
/// a login check.
pub fn collect_probe(form: &IntakeForm) -> Result<ConnectionProbe, ValidationError> {
    let port = validate_target(&form.host, &form.port)?;

    Ok(ConnectionProbe {
        host: form.host.clone(),
        port,
        username: form.username.clone(),
        password: form.password.clone(),
        tls: form.tls,
        ignore_cert_errors: form.ignore_cert_errors,
    })
}
