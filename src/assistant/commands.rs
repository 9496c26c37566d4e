/// Slash commands typed into the chat input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    GoTo(String),
    NewSession,
    Clear,
    History,
    Load(String),
    Theme(String),
    Voice(String),
    Help,
    Unknown(String),
}

pub const HELP_TEXT: &str = "Comandos disponibles:\n\
/ir <sección>: te llevo a una sección de la página (servicios, proceso, precios, testimonios, contacto)\n\
/nuevo: empieza una conversación nueva\n\
/limpiar: borra los mensajes de esta conversación\n\
/historial: lista las conversaciones guardadas\n\
/cargar <id>: retoma una conversación guardada\n\
/tema <claro|oscuro|sistema>: cambia el tema del chat\n\
/voz <on|off>: activa o desactiva las respuestas habladas\n\
/ayuda: muestra esta ayuda";

/// Parses a slash command. Returns `None` for ordinary chat text.
pub fn parse(input: &str) -> Option<Command> {
    let rest = input.trim().strip_prefix('/')?;
    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    let command = match name.to_lowercase().as_str() {
        "ir" | "go" | "goto" | "ver" => Command::GoTo(arg.to_string()),
        "nuevo" | "nueva" | "new" => Command::NewSession,
        "limpiar" | "clear" => Command::Clear,
        "historial" | "history" => Command::History,
        "cargar" | "load" => Command::Load(arg.to_string()),
        "tema" | "theme" => Command::Theme(arg.to_string()),
        "voz" | "voice" => Command::Voice(arg.to_string()),
        "ayuda" | "help" | "?" => Command::Help,
        other => Command::Unknown(other.to_string()),
    };
    Some(command)
}
