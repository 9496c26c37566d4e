use crate::navigation::matcher::fold_diacritics;

struct Topic {
    /// Matched as token prefixes, to catch plurals and inflections.
    stems: &'static [&'static str],
    /// Matched as whole tokens only; short words would hit unrelated ones as prefixes.
    words: &'static [&'static str],
    reply: &'static str,
}

impl Topic {
    fn matches(&self, token: &str) -> bool {
        self.words.contains(&token) || self.stems.iter().any(|stem| token.starts_with(stem))
    }
}

// First topic with a matching token wins.
const TOPICS: &[Topic] = &[
    Topic {
        stems: &["precio", "costo", "cuesta", "tarifa", "presupuesto", "pricing"],
        words: &["plan", "planes", "price", "prices"],
        reply: "Tenemos tres planes: Básico, Profesional y Empresarial, pensados para cada etapa de tu negocio. Escribe /ir precios para verlos en detalle.",
    },
    Topic {
        stems: &["servicio", "desarrollo", "marketing", "diseno", "service"],
        words: &["web", "app", "apps", "seo"],
        reply: "Ofrecemos desarrollo web y móvil, marketing digital, SEO y consultoría de transformación digital. Escribe /ir servicios para conocer cada uno.",
    },
    Topic {
        stems: &["proceso", "metodolog", "etapa", "trabajan", "process"],
        words: &[],
        reply: "Trabajamos en cuatro etapas: descubrimiento, estrategia, implementación y seguimiento. Escribe /ir proceso para ver cómo lo hacemos.",
    },
    Topic {
        stems: &["testimoni", "cliente", "opinion", "review"],
        words: &["casos", "exito"],
        reply: "Nuestros clientes destacan los resultados medibles y el acompañamiento cercano. Escribe /ir testimonios para leer sus opiniones.",
    },
    Topic {
        stems: &["contact", "correo", "email", "telefono", "llamad", "llamar", "reunion", "agendar"],
        words: &["cita", "citas"],
        reply: "Puedes escribirnos desde el formulario de contacto y te respondemos en menos de 24 horas. Escribe /ir contacto para llegar al formulario.",
    },
    Topic {
        stems: &["gracias", "thanks"],
        words: &["thank"],
        reply: "¡Con gusto! Si necesitas algo más, aquí estoy.",
    },
    Topic {
        stems: &["saludos"],
        words: &["hola", "buenas", "buenos", "hello", "hi", "hey"],
        reply: "¡Hola! Puedo contarte sobre nuestros servicios, proceso de trabajo, precios o ayudarte a contactarnos.",
    },
];

pub const FALLBACK_REPLY: &str =
    "No estoy seguro de haber entendido. Puedo ayudarte con servicios, proceso, precios, testimonios o contacto. Escribe /ayuda para ver los comandos.";

pub const NEGATIVE_PREFIX: &str = "Lamento que estés teniendo inconvenientes. ";

/// Picks the canned reply for the first topic any token of `text` matches.
pub fn reply_for(text: &str) -> &'static str {
    let folded = fold_diacritics(text);
    let tokens: Vec<&str> = folded
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();

    TOPICS.iter()
        .find(|topic| tokens.iter().any(|token| topic.matches(token)))
        .map(|topic| topic.reply)
        .unwrap_or(FALLBACK_REPLY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pricing_question_gets_pricing_reply() {
        assert!(reply_for("¿Cuánto cuestan sus PLANES?").contains("/ir precios"));
    }

    #[test]
    fn accents_are_ignored() {
        assert!(reply_for("¿Cuál es su metodología?").contains("/ir proceso"));
        assert!(reply_for("quiero una reunión").contains("/ir contacto"));
    }

    #[test]
    fn short_words_need_a_whole_token() {
        assert_eq!(reply_for("hice una historia sobre un planeta"), FALLBACK_REPLY);
        assert_eq!(reply_for("en caso de duda, me llamo Ana"), FALLBACK_REPLY);
        assert!(reply_for("hi there").starts_with("¡Hola!"));
        assert!(reply_for("¿Tienen una app?").contains("/ir servicios"));
        assert!(reply_for("quiero el plan básico").contains("/ir precios"));
    }

    #[test]
    fn unknown_text_falls_back() {
        assert_eq!(reply_for("xyz"), FALLBACK_REPLY);
        assert_eq!(reply_for(""), FALLBACK_REPLY);
    }
}
