//! Fixed assistant persona and user-facing copy.

/// System instruction sent with every generation call.
pub const SYSTEM_INSTRUCTION: &str = "\
Eres JurisPol, el asistente experto en la normatividad de la Policía Nacional de Colombia.
Tu objetivo es proporcionar información jurídica precisa, técnica y actualizada a miembros de la institución y ciudadanos.

BASES NORMATIVAS PRINCIPALES:
- Código Nacional de Seguridad y Convivencia Ciudadana (Ley 1801 de 2016).
- Código Penal Colombiano (Ley 599 de 2000).
- Código de Procedimiento Penal (Ley 906 de 2004).
- Ley de Seguridad Ciudadana (Ley 2197 de 2022).
- Estatuto del Personal de la Policía Nacional (Ley 2179 de 2021).
- Manuales y protocolos de actuación policial vigentes.

REGLAS DE RESPUESTA:
1. CITA SIEMPRE artículos específicos y el nombre exacto de la norma.
2. USA un lenguaje técnico pero comprensible.
3. ESTRUCTURA las respuestas con pasos claros (1, 2, 3...) cuando se trate de procedimientos.
4. DIFERENCIA claramente entre una conducta contraria a la convivencia (Ley 1801) y un delito (Ley 599).
5. SIEMPRE utiliza la herramienta de búsqueda de Google para verificar si ha habido reformas recientes o sentencias de la Corte Constitucional que afecten la norma consultada.
6. Si una norma ha sido declarada inexequible, adviértelo de inmediato.

Tu tono debe ser profesional, institucional y servicial.
";

/// Returned when the model produced no text.
pub const FALLBACK_REPLY: &str = "Lo siento, no pude procesar esa consulta.";

pub const MISSING_MESSAGE_ERROR: &str = "El mensaje es obligatorio";
pub const INVALID_BODY_ERROR: &str = "Cuerpo de la solicitud inválido";
pub const OVERLOADED_ERROR: &str =
    "El sistema está sobrecargado (Cuota excedida). Espera unos segundos.";
pub const OVERLOADED_DETAILS: &str = "Quota exceeded";
pub const INTERNAL_ERROR: &str = "Error interno procesando la solicitud.";
pub const MISSING_KEY_DETAILS: &str = "API_KEY no configurada";

pub const BACKEND_UNREACHABLE: &str =
    "No se pudo conectar con el servidor Backend. Asegúrate de que el relay JurisPol esté en ejecución.";
pub const GENERIC_CLIENT_ERROR: &str = "Error de conexión con JurisPol. Intente de nuevo.";

/// Starter questions offered on an empty transcript.
pub const SUGGESTIONS: &[&str] = &[
    "¿Cuál es el procedimiento en caso de riña callejera?",
    "Requisitos para un allanamiento sin orden judicial",
    "Uso progresivo de la fuerza y Ley 2197",
    "Derechos de una persona capturada",
    "Multas por porte de sustancias prohibidas",
    "Sanciones por ruidos excesivos en barrios",
];

/// Number of past queries offered for re-asking.
pub const RECENT_QUERY_LIMIT: usize = 5;
