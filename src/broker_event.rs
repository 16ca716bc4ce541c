/// Events emitted by a broker during operations.
///
/// These events are passed to the tracing callback set via `set_trace_callback`.
/// They borrow from the operation that produced them; use `to_string()` to keep
/// a copy.
///
/// # Examples
///
/// ```rust
/// use pubsub_registry::BrokerEvent;
///
/// let event = BrokerEvent::Publish { topic: "ping", delivered: 2 };
/// assert_eq!(event.to_string(), "publish { topic: ping, delivered: 2 }");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrokerEvent<'a> {
    /// A callback was stored.
    Subscribe {
        topic: &'a str,
        /// The subscriber's type name (e.g. `my_app::StatusBar`)
        subscriber: &'static str,
        /// Whether an earlier callback in the same slot was replaced
        replaced: bool,
    },

    /// A topic was published.
    Publish {
        topic: &'a str,
        /// Number of callbacks actually invoked
        delivered: usize,
    },

    /// An unsubscribe request was processed.
    Unsubscribe {
        topic: &'a str,
        subscriber: &'static str,
        removed: usize,
    },

    /// Entries of dropped subscribers were purged.
    Reap { removed: usize },

    /// The broker was cleared.
    Clear {},
}

impl std::fmt::Display for BrokerEvent<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BrokerEvent::Subscribe {
                topic,
                subscriber,
                replaced,
            } => write!(
                f,
                "subscribe {{ topic: {topic}, subscriber: {subscriber}, replaced: {replaced} }}"
            ),
            BrokerEvent::Publish { topic, delivered } => {
                write!(f, "publish {{ topic: {topic}, delivered: {delivered} }}")
            }
            BrokerEvent::Unsubscribe {
                topic,
                subscriber,
                removed,
            } => write!(
                f,
                "unsubscribe {{ topic: {topic}, subscriber: {subscriber}, removed: {removed} }}"
            ),
            BrokerEvent::Reap { removed } => write!(f, "reap {{ removed: {removed} }}"),
            BrokerEvent::Clear {} => write!(f, "Clearing the Broker"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broker_event_display() {
        let event = BrokerEvent::Subscribe {
            topic: "ping",
            subscriber: "u8",
            replaced: false,
        };
        assert_eq!(
            event.to_string(),
            "subscribe { topic: ping, subscriber: u8, replaced: false }"
        );

        let event = BrokerEvent::Unsubscribe {
            topic: "ping",
            subscriber: "u8",
            removed: 1,
        };
        assert_eq!(
            event.to_string(),
            "unsubscribe { topic: ping, subscriber: u8, removed: 1 }"
        );

        let event = BrokerEvent::Reap { removed: 3 };
        assert_eq!(event.to_string(), "reap { removed: 3 }");

        assert_eq!(BrokerEvent::Clear {}.to_string(), "Clearing the Broker");
    }

    #[test]
    fn test_broker_event_clone() {
        let event = BrokerEvent::Publish {
            topic: "evt",
            delivered: 0,
        };
        assert_eq!(event.clone(), event);
    }
}
