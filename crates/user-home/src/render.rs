//! Plain-text rendering of the UserHome view.

use chat_core::{Message, PurchaseRecord, Role, User};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use home_session::{EntryRedirect, RedirectReason, ViewState};

/// Shown below the transcript while a reply is pending.
pub const TYPING_INDICATOR: &str = "Escribiendo...";

/// Shown in place of the transcript when it has no messages.
pub const EMPTY_TRANSCRIPT: &str = "No hay mensajes aún. ¡Inicia una conversación!";

/// Shown when a message is typed while a reply is still pending.
pub const BUSY_NOTICE: &str = "Espera la respuesta del asistente antes de enviar otro mensaje.";

const EMPTY_PURCHASES: &str = "No hay compras registradas.";

/// Welcome line and user-info table.
pub fn render_profile(user: &User) -> String {
    let mut out = format!("¡Bienvenido {}!\n\n", user.nombre);
    out.push_str(&render_table(
        &["Nombre", "Correo"],
        &[vec![user.nombre.clone(), user.correo.clone()]],
    ));
    out
}

/// Label shown before a message for its author.
pub fn speaker(role: Role) -> &'static str {
    match role {
        Role::User => "Tú",
        Role::Assistant => "Asistente",
    }
}

/// One transcript line: `[HH:MM:SS] Tú: hola`.
pub fn format_message(message: &Message) -> String {
    format!(
        "[{}] {}: {}",
        message.display_time,
        speaker(message.role),
        message.content
    )
}

/// Chat section: heading, transcript or empty state, and the typing indicator.
pub fn render_chat(state: &ViewState) -> String {
    let mut out = String::from("Chat Asistente\n");

    if state.messages.is_empty() {
        out.push_str(EMPTY_TRANSCRIPT);
        out.push('\n');
    } else {
        for message in &state.messages {
            out.push_str(&format_message(message));
            out.push('\n');
        }
    }

    if state.is_busy() {
        out.push_str(TYPING_INDICATOR);
        out.push('\n');
    }

    out
}

/// Purchase history table.
pub fn render_purchases(rows: &[PurchaseRecord]) -> String {
    let mut out = String::from("Historial de Compras\n");

    if rows.is_empty() {
        out.push_str(EMPTY_PURCHASES);
        out.push('\n');
        return out;
    }

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            vec![
                row.producto.clone(),
                row.valor.to_string(),
                format_fecha(&row.fecha_v),
                row.estado.clone(),
            ]
        })
        .collect();

    out.push_str(&render_table(&["Producto", "Valor", "Fecha", "Estado"], &cells));
    out
}

/// Message shown when the view sends the user back to the entry view.
pub fn render_redirect(redirect: &EntryRedirect) -> String {
    match redirect.reason {
        RedirectReason::LoggedOut => "Sesión cerrada.".to_string(),
        _ => "No hay una sesión activa. Inicia sesión con `user-home login`.".to_string(),
    }
}

/// Show a backend date as local `dd/mm/yyyy`, or verbatim when it does not parse.
pub fn format_fecha(raw: &str) -> String {
    const DATE_FORMAT: &str = "%d/%m/%Y";
    let raw_trimmed = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw_trimmed) {
        return parsed.with_timezone(&Local).format(DATE_FORMAT).to_string();
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw_trimmed, pattern) {
            return parsed.format(DATE_FORMAT).to_string();
        }
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(raw_trimmed, "%Y-%m-%d") {
        return parsed.format(DATE_FORMAT).to_string();
    }

    raw.to_string()
}

fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect();
        format!("| {} |\n", padded.join(" | "))
    };

    let mut out = line(headers.to_vec());
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&format!("|-{}-|\n", rule.join("-|-")));
    for row in rows {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_core::{Amount, MessageId};
    use chrono::Utc;
    use home_session::DispatchPhase;

    #[test]
    fn test_profile() {
        let out = render_profile(&User::new("u1", "Ana", "ana@x.com"));

        assert!(out.starts_with("¡Bienvenido Ana!\n"));
        assert!(out.contains("| Nombre | Correo    |"));
        assert!(out.contains("| Ana    | ana@x.com |"));
    }

    #[test]
    fn test_empty_chat() {
        let out = render_chat(&ViewState::default());
        assert_eq!(out, format!("Chat Asistente\n{}\n", EMPTY_TRANSCRIPT));
    }

    #[test]
    fn test_chat_lines_and_typing_indicator() {
        let mut state = ViewState::default();
        let message = Message::user(MessageId::new(1), "precio?", Utc::now());
        let expected_line = format!("[{}] Tú: precio?", message.display_time);
        state.messages.push(message);
        state.phase = DispatchPhase::Sending;

        let out = render_chat(&state);

        assert!(out.contains(&expected_line));
        assert!(out.ends_with("Escribiendo...\n"));
        assert!(!out.contains(EMPTY_TRANSCRIPT));
    }

    #[test]
    fn test_assistant_label() {
        let message = Message::assistant(MessageId::new(2), "100 USD", Utc::now());
        assert!(format_message(&message).ends_with("] Asistente: 100 USD"));
    }

    #[test]
    fn test_purchases_table() {
        let rows = vec![PurchaseRecord {
            producto: "Netflix".to_string(),
            valor: Amount::Text("$15.000".to_string()),
            fecha_v: "2025-06-30".to_string(),
            estado: "Activo".to_string(),
        }];

        let out = render_purchases(&rows);

        assert!(out.starts_with("Historial de Compras\n"));
        assert!(out.contains("| Producto | Valor   | Fecha      | Estado |"));
        assert!(out.contains("| Netflix  | $15.000 | 30/06/2025 | Activo |"));
    }

    #[test]
    fn test_no_purchases() {
        assert!(render_purchases(&[]).contains(EMPTY_PURCHASES));
    }

    #[test]
    fn test_format_fecha() {
        assert_eq!(format_fecha("2025-06-30"), "30/06/2025");
        assert_eq!(format_fecha("2025-06-30T10:00:00"), "30/06/2025");
        assert_eq!(format_fecha("pronto"), "pronto");
        assert_eq!(format_fecha(""), "");
    }

    #[test]
    fn test_redirect_messages() {
        let logged_out: EntryRedirect = RedirectReason::LoggedOut.into();
        assert_eq!(render_redirect(&logged_out), "Sesión cerrada.");

        let missing: EntryRedirect = RedirectReason::NoIdentity.into();
        assert!(render_redirect(&missing).contains("user-home login"));
    }
}
