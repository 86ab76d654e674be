use crate::protocol::qos::QoS;

/// Username plus optional password carried by a CONNECT message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: Option<String>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            username: username.into(),
            password: Some(password.into()),
        }
    }

    pub fn username_only(username: impl Into<String>) -> Self {
        Credentials {
            username: username.into(),
            password: None,
        }
    }
}

impl std::fmt::Display for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.password {
            Some(_) => write!(f, "{}:***", self.username),
            None => f.write_str(&self.username),
        }
    }
}

/// Last-will message registered at connect time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Will {
    pub topic: String,
    pub message: String,
    pub qos: QoS,
    pub retain: bool,
}

impl Will {
    pub fn new(
        topic: impl Into<String>,
        message: impl Into<String>,
        qos: QoS,
        retain: bool,
    ) -> Self {
        Will {
            topic: topic.into(),
            message: message.into(),
            qos,
            retain,
        }
    }
}

impl std::fmt::Display for Will {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <- {} ({})", self.topic, self.message, self.qos)
    }
}

/// MQTT v3.1 CONNECT message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectMessage {
    pub client_id: String,
    pub credentials: Option<Credentials>,
    pub will: Option<Will>,
    pub keep_alive: u16,
    pub clean_session: bool,
}

impl ConnectMessage {
    /// A CONNECT with neither credentials nor a will.
    pub fn new(client_id: impl Into<String>, keep_alive: u16, clean_session: bool) -> Self {
        ConnectMessage {
            client_id: client_id.into(),
            credentials: None,
            will: None,
            keep_alive,
            clean_session,
        }
    }
}

impl std::fmt::Display for ConnectMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{ ID: {}", self.client_id)?;
        if let Some(credentials) = &self.credentials {
            write!(f, ", CRED: {}", credentials)?;
        }
        if let Some(will) = &self.will {
            write!(f, ", WILL: {}", will)?;
        }
        write!(
            f,
            ", KA: {}, CS: {} }}",
            self.keep_alive, self.clean_session
        )
    }
}
