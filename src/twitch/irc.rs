//! Minimal IRC line handling for Twitch chat over WebSocket.

/// One parsed IRC line: `[@tags] [:prefix] COMMAND [params...] [:trailing]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrcMessage<'a> {
    pub tags: Option<&'a str>,
    pub prefix: Option<&'a str>,
    pub command: &'a str,
    pub params: Vec<&'a str>,
}

impl<'a> IrcMessage<'a> {
    pub fn parse(line: &'a str) -> Option<Self> {
        let mut rest = line.trim_end_matches(['\r', '\n']);

        let mut tags = None;
        if let Some(stripped) = rest.strip_prefix('@') {
            let (t, r) = stripped.split_once(' ')?;
            tags = Some(t);
            rest = r.trim_start();
        }

        let mut prefix = None;
        if let Some(stripped) = rest.strip_prefix(':') {
            let (p, r) = stripped.split_once(' ')?;
            prefix = Some(p);
            rest = r.trim_start();
        }

        let (command, mut rest) = match rest.split_once(' ') {
            Some((c, r)) => (c, r),
            None => (rest, ""),
        };
        if command.is_empty() {
            return None;
        }

        let mut params = Vec::new();
        while !rest.is_empty() {
            if let Some(trailing) = rest.strip_prefix(':') {
                params.push(trailing);
                break;
            }
            match rest.split_once(' ') {
                Some((p, r)) => {
                    if !p.is_empty() {
                        params.push(p);
                    }
                    rest = r;
                }
                None => {
                    params.push(rest);
                    break;
                }
            }
        }

        Some(Self {
            tags,
            prefix,
            command,
            params,
        })
    }

    /// Nick portion of `nick!user@host`.
    pub fn nick(&self) -> Option<&'a str> {
        self.prefix.map(|p| p.split('!').next().unwrap_or(p))
    }

    /// Value of an IRCv3 tag, e.g. `msg-id`.
    pub fn tag(&self, key: &str) -> Option<&'a str> {
        self.tags?
            .split(';')
            .filter_map(|t| t.split_once('='))
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }

    pub fn trailing(&self) -> Option<&'a str> {
        self.params.last().copied()
    }
}

/// `#channel`, lowercased.
pub fn channel_name(channel: &str) -> String {
    let channel = channel.trim_start_matches('#').to_lowercase();
    format!("#{}", channel)
}

/// Login handshake; the last line joins `channel`.
pub fn handshake(nick: &str, secret: &str, channel: &str) -> Vec<String> {
    let pass = if secret.starts_with("oauth:") {
        format!("PASS {}", secret)
    } else {
        format!("PASS oauth:{}", secret)
    };
    vec![
        "CAP REQ :twitch.tv/tags twitch.tv/commands".to_string(),
        pass,
        format!("NICK {}", nick.to_lowercase()),
        format!("JOIN {}", channel_name(channel)),
    ]
}

pub fn privmsg(channel: &str, text: &str) -> String {
    // Line breaks would terminate the IRC command early.
    let text = text.replace(['\r', '\n'], " ");
    format!("PRIVMSG {} :{}", channel_name(channel), text)
}

pub fn pong(server: &str) -> String {
    format!("PONG :{}", server)
}

/// True for the server NOTICEs sent when PASS/NICK are rejected.
pub fn is_login_failure(msg: &IrcMessage<'_>) -> bool {
    msg.command == "NOTICE"
        && msg.trailing().is_some_and(|t| {
            t.contains("Login authentication failed") || t.contains("Improperly formatted auth")
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_privmsg_with_tags() {
        let line = "@badge-info=;color=#FF0000;display-name=Bob :bob!bob@bob.tmi.twitch.tv PRIVMSG #operator :hello there\r\n";
        let msg = IrcMessage::parse(line).unwrap();
        assert_eq!(msg.tags, Some("badge-info=;color=#FF0000;display-name=Bob"));
        assert_eq!(msg.nick(), Some("bob"));
        assert_eq!(msg.command, "PRIVMSG");
        assert_eq!(msg.params, vec!["#operator", "hello there"]);
        assert_eq!(msg.trailing(), Some("hello there"));
        assert_eq!(msg.tag("display-name"), Some("Bob"));
        assert_eq!(msg.tag("badge-info"), Some(""));
        assert_eq!(msg.tag("missing"), None);
    }

    #[test]
    fn test_parse_ping() {
        let msg = IrcMessage::parse("PING :tmi.twitch.tv").unwrap();
        assert_eq!(msg.prefix, None);
        assert_eq!(msg.command, "PING");
        assert_eq!(msg.trailing(), Some("tmi.twitch.tv"));
    }

    #[test]
    fn test_parse_join_echo() {
        let msg = IrcMessage::parse(":raidbot!raidbot@raidbot.tmi.twitch.tv JOIN #operator").unwrap();
        assert_eq!(msg.command, "JOIN");
        assert_eq!(msg.nick(), Some("raidbot"));
        assert_eq!(msg.params, vec!["#operator"]);
    }

    #[test]
    fn test_parse_numeric_reply() {
        let msg = IrcMessage::parse(":tmi.twitch.tv 001 raidbot :Welcome, GLHF!").unwrap();
        assert_eq!(msg.command, "001");
        assert_eq!(msg.params, vec!["raidbot", "Welcome, GLHF!"]);
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(IrcMessage::parse("").is_none());
        assert!(IrcMessage::parse("@tags-only").is_none());
    }

    #[test]
    fn test_login_failure_notice() {
        let msg = IrcMessage::parse(":tmi.twitch.tv NOTICE * :Login authentication failed").unwrap();
        assert!(is_login_failure(&msg));
        let other = IrcMessage::parse(":tmi.twitch.tv NOTICE #operator :Slow mode is on").unwrap();
        assert!(!is_login_failure(&other));
    }

    #[test]
    fn test_handshake_adds_oauth_prefix() {
        let lines = handshake("RaidBot", "abc123", "Operator");
        assert_eq!(lines[1], "PASS oauth:abc123");
        assert_eq!(lines[2], "NICK raidbot");
        assert_eq!(lines[3], "JOIN #operator");

        let lines = handshake("raidbot", "oauth:abc123", "#operator");
        assert_eq!(lines[1], "PASS oauth:abc123");
        assert_eq!(lines[3], "JOIN #operator");
    }

    #[test]
    fn test_privmsg_flattens_newlines() {
        assert_eq!(privmsg("Operator", "a\r\nb"), "PRIVMSG #operator :a  b");
        assert_eq!(pong("tmi.twitch.tv"), "PONG :tmi.twitch.tv");
    }
}
