//! Line-oriented console client for a running relay.

use chrono::Local;
use jurispol_chat::config::{RECENT_QUERY_LIMIT, SUGGESTIONS};
use jurispol_chat::{ChatState, Message, RelayClient, Role};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

const SOURCE_TITLE_MAX: usize = 30;

/// Parsed console input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ask(String),
    Suggestion(usize),
    Repeat(usize),
    History,
    Clear,
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let Some(rest) = line.strip_prefix('/') else {
        return Command::Ask(line.to_string());
    };

    let mut parts = rest.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("quit" | "exit"), _) => Command::Quit,
        (Some("clear"), _) => Command::Clear,
        (Some("history"), _) => Command::History,
        (Some("help"), _) => Command::Help,
        (Some("r"), Some(n)) => match n.parse() {
            Ok(n) => Command::Repeat(n),
            Err(_) => Command::Unknown(line.to_string()),
        },
        (Some(n), None) => match n.parse() {
            Ok(n) => Command::Suggestion(n),
            Err(_) => Command::Unknown(line.to_string()),
        },
        _ => Command::Unknown(line.to_string()),
    }
}

/// Shorten long citation titles for display.
pub fn truncate_title(title: &str) -> String {
    if title.chars().count() > SOURCE_TITLE_MAX {
        let short: String = title.chars().take(SOURCE_TITLE_MAX).collect();
        format!("{}...", short)
    } else {
        title.to_string()
    }
}

pub fn render_message(message: &Message) -> String {
    let speaker = match message.role {
        Role::User => "Usted",
        Role::Assistant => "JurisPol",
    };
    let time = message.timestamp.with_timezone(&Local).format("%H:%M");

    let mut out = format!("[{}] {}:\n{}\n", time, speaker, message.content);
    if message.role == Role::Assistant {
        if let Some(sources) = message.sources.as_ref().filter(|s| !s.is_empty()) {
            out.push_str("Fuentes consultadas:\n");
            for source in sources {
                out.push_str(&format!("  - {} <{}>\n", truncate_title(&source.title), source.uri));
            }
        }
    }
    out
}

pub fn welcome() -> String {
    let mut out = String::from(
        "Bienvenido a JurisPol\n\
         Asistente IA especializado en las leyes, decretos y protocolos del servicio de policía en Colombia.\n\n\
         Consultas sugeridas:\n",
    );
    for (i, suggestion) in SUGGESTIONS.iter().enumerate() {
        out.push_str(&format!("  /{} {}\n", i + 1, suggestion));
    }
    out.push_str("\nEscriba /help para ver los comandos.\n");
    out
}

fn help() -> &'static str {
    "Comandos:\n  \
     <texto>     enviar una consulta\n  \
     /N          enviar la consulta sugerida N\n  \
     /history    consultas recientes\n  \
     /r N        repetir la consulta reciente N\n  \
     /clear      limpiar la consulta\n  \
     /quit       salir\n"
}

/// Run the interactive client until EOF or `/quit`.
pub async fn run(relay_url: &str) -> anyhow::Result<()> {
    let client = RelayClient::new(relay_url)?;
    info!("Console client using {}", client.endpoint());

    let mut state = ChatState::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", welcome());

    while let Some(line) = lines.next_line().await? {
        let text = match parse_command(&line) {
            Command::Quit => break,
            Command::Help => {
                println!("{}", help());
                continue;
            }
            Command::Clear => {
                state.clear();
                println!("Historial de consulta borrado.");
                continue;
            }
            Command::History => {
                let recent = state.recent_queries(RECENT_QUERY_LIMIT);
                if recent.is_empty() {
                    println!("No hay consultas previas");
                }
                for (i, query) in recent.iter().enumerate() {
                    println!("  {}. {}", i + 1, query);
                }
                continue;
            }
            Command::Suggestion(n) => match SUGGESTIONS.get(n.wrapping_sub(1)) {
                Some(s) => s.to_string(),
                None => {
                    println!("Sugerencia inexistente: {}", n);
                    continue;
                }
            },
            Command::Repeat(n) => {
                match state.recent_queries(RECENT_QUERY_LIMIT).get(n.wrapping_sub(1)) {
                    Some(q) => q.to_string(),
                    None => {
                        println!("Consulta reciente inexistente: {}", n);
                        continue;
                    }
                }
            }
            Command::Unknown(cmd) => {
                println!("Comando desconocido: {}", cmd);
                continue;
            }
            Command::Ask(text) => text,
        };

        if text.trim().is_empty() {
            continue;
        }

        let before = state.messages.len();
        println!("Consultando Código Nacional...");
        if !state.send(&client, &text).await {
            continue;
        }

        // The user message is already on screen as typed; show what came back.
        for message in state.messages.iter().skip(before + 1) {
            println!("{}", render_message(message));
        }
        if let Some(err) = &state.error {
            println!("[!] {}\n", err);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jurispol_chat::GroundingSource;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("  hola  "), Command::Ask("hola".into()));
        assert_eq!(parse_command("/quit"), Command::Quit);
        assert_eq!(parse_command("/clear"), Command::Clear);
        assert_eq!(parse_command("/3"), Command::Suggestion(3));
        assert_eq!(parse_command("/r 2"), Command::Repeat(2));
        assert_eq!(parse_command("/bogus"), Command::Unknown("/bogus".into()));
    }

    #[test]
    fn test_truncate_title() {
        assert_eq!(truncate_title("Ley 1801"), "Ley 1801");
        let long = "Código Nacional de Seguridad y Convivencia Ciudadana";
        let short = truncate_title(long);
        assert!(short.ends_with("..."));
        assert_eq!(short.chars().count(), SOURCE_TITLE_MAX + 3);
    }

    #[test]
    fn test_render_assistant_sources() {
        let message = Message::assistant(
            "Respuesta",
            vec![GroundingSource {
                title: "Ley 1801 de 2016".into(),
                uri: "https://ley.example".into(),
            }],
        );
        let out = render_message(&message);
        assert!(out.contains("JurisPol:"));
        assert!(out.contains("Fuentes consultadas:"));
        assert!(out.contains("https://ley.example"));
    }

    #[test]
    fn test_render_user_has_no_sources_block() {
        let out = render_message(&Message::user("pregunta"));
        assert!(out.contains("Usted:"));
        assert!(!out.contains("Fuentes"));
    }

    #[test]
    fn test_welcome_lists_suggestions() {
        let out = welcome();
        for suggestion in SUGGESTIONS {
            assert!(out.contains(suggestion));
        }
    }
}
