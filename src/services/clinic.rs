//! Clinic profile: static facts shared by the page, the assistant and the
//! fallback messages.

use serde::Serialize;

pub const CLINIC_NAME: &str = "Dr. Vaibbhav Guray Chiropractic";
pub const PHONE_DISPLAY: &str = "+91 99203 27166";
pub const DIAL_URI: &str = "tel:+919920327166";
pub const EMAIL: &str = "info@drvaibhavchiro.com";

/// First assistant turn of every new conversation.
pub const GREETING: &str = "Welcome to Dr. Vaibbhav Guray's chiropractic concierge. \
I can help with questions about our care, techniques and locations. How may I help you today?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Location {
    pub name: &'static str,
    pub area: &'static str,
}

pub const LOCATIONS: [Location; 2] = [
    Location { name: "South Mumbai Center", area: "Marine Drive / Colaba" },
    Location { name: "Andheri West Center", area: "Link Road, Andheri West" },
];

/// Payload of `GET /api/clinic`.
#[derive(Debug, Clone, Serialize)]
pub struct ClinicProfile {
    pub name: &'static str,
    pub phone: &'static str,
    pub dial_uri: &'static str,
    pub email: &'static str,
    pub greeting: &'static str,
    pub locations: &'static [Location],
}

#[must_use]
pub fn profile() -> ClinicProfile {
    ClinicProfile {
        name: CLINIC_NAME,
        phone: PHONE_DISPLAY,
        dial_uri: DIAL_URI,
        email: EMAIL,
        greeting: GREETING,
        locations: &LOCATIONS,
    }
}

// =============================================================================
// SYSTEM INSTRUCTION
// =============================================================================

/// Fixed instruction sent ahead of every conversation.
#[must_use]
pub fn system_prompt() -> String {
    let locations = LOCATIONS
        .iter()
        .enumerate()
        .map(|(i, l)| format!("  {}. {} ({})", i + 1, l.name, l.area))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are the front-desk assistant for {CLINIC_NAME}.\n\
         \n\
         Clinic facts:\n\
         - Practitioner: Dr. Vaibbhav Guray, IPHM (International Practitioners of Holistic Medicine) certified.\n\
         - Focus: spinal biomechanics, standard and advanced chiropractic adjustments.\n\
         - Locations:\n{locations}\n\
         - Availability: weekdays, Monday to Friday.\n\
         - Phone: {PHONE_DISPLAY}. Email: {EMAIL}.\n\
         \n\
         General background you may explain:\n\
         - Chiropractic care treats neuromuscular complaints, mainly through manual adjustment of the spine.\n\
         - Diversified technique: high-velocity, low-amplitude thrusts that restore joint motion; the audible pop is joint cavitation.\n\
         - Gonstead technique: detailed spinal analysis followed by precise adjustments without rotation.\n\
         - Typical aims: less pain, better spinal motion, better physical function.\n\
         \n\
         Rules:\n\
         - Be professional and concise. No flowery language.\n\
         - You are not a clinician and never diagnose. For a specific complaint, explain the general approach and say \
           the doctor must assess it in person.\n\
         - Always recommend a consultation and point to the Book Appointment button."
    )
}
