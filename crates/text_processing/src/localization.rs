//! User-facing texts keyed by language

use calorisensei_core::Language;

/// Banner shown after the completion retries are exhausted
pub const SERVICE_UNAVAILABLE_BANNER: &str =
    "Service temporarily unavailable. Please try again later.";

pub const OFFLINE_BANNER: &str = "Network connection lost. Please check your internet connection.";

pub const ONLINE_BANNER: &str = "Connection restored. You can continue your consultation.";

pub const VOICE_UNSUPPORTED_BANNER: &str =
    "Voice input is not supported on this device. Please type your message.";

pub const RECOGNITION_FAILED_BANNER: &str =
    "Could not understand the audio. Please try again or type your message.";

/// Safety disclaimer appended to every answer, including its leading blank line
pub fn disclaimer(language: Language) -> &'static str {
    match language {
        Language::English => "\n\n🔍 Note: This is general fitness advice. Always consult a professional before starting any diet or exercise regimen.",
        Language::Spanish => "\n\n🔍 Nota: Este es un consejo general de acondicionamiento físico. Consulte siempre a un profesional antes de comenzar cualquier dieta o rutina de ejercicios.",
        Language::French => "\n\n🔍 Remarque: Il s'agit de conseils généraux de remise en forme. Consultez toujours un professionnel avant de commencer un régime ou un programme d'exercices.",
        Language::Arabic => "\n\n🔍 ملاحظة: هذه نصيحة لياقة بدنية عامة. استشر دائمًا أخصائيًا قبل البدء في أي نظام غذائي أو برنامج تمارين.",
        Language::Hindi => "\n\n🔍 नोट: यह सामान्य फिटनेस सलाह है। कोई भी डाइट या व्यायाम शुरू करने से पहले हमेशा किसी पेशेवर से परामर्श करें।",
        Language::Gujarati => "\n\n🔍 નોંધ: આ સામાન્ય ફિટનેસ સલાહ છે. કોઈપણ ડાયટ કે કસરત શરૂ કરતા પહેલા હંમેશા વ્યાવસાયિકની સલાહ લો.",
    }
}

/// Notice returned instead of a model answer when emergency phrases are found
pub fn emergency_notice(language: Language) -> &'static str {
    match language {
        Language::English => "⚠️ Your message mentions symptoms that may need urgent care. Please contact your local emergency number or a healthcare provider right away.",
        Language::Spanish => "⚠️ Su mensaje menciona síntomas que pueden requerir atención urgente. Llame al número de emergencias local o a un profesional de la salud de inmediato.",
        Language::French => "⚠️ Votre message mentionne des symptômes qui peuvent nécessiter des soins urgents. Contactez immédiatement le numéro d'urgence local ou un professionnel de santé.",
        Language::Arabic => "⚠️ تشير رسالتك إلى أعراض قد تتطلب رعاية عاجلة. يرجى الاتصال برقم الطوارئ المحلي أو بمقدم رعاية صحية على الفور.",
        Language::Hindi => "⚠️ आपके संदेश में ऐसे लक्षण हैं जिन्हें तुरंत देखभाल की ज़रूरत हो सकती है। कृपया तुरंत स्थानीय आपातकालीन नंबर या किसी स्वास्थ्य सेवा प्रदाता से संपर्क करें।",
        Language::Gujarati => "⚠️ તમારા સંદેશમાં એવા લક્ષણો છે જેને તાત્કાલિક સારવારની જરૂર પડી શકે છે. કૃપા કરીને તરત જ સ્થાનિક ઇમરજન્સી નંબર અથવા આરોગ્ય સેવા પ્રદાતાનો સંપર્ક કરો.",
    }
}

/// Emergency notice followed by the disclaimer
pub fn emergency_response(language: Language) -> String {
    format!("{}{}", emergency_notice(language), disclaimer(language))
}

/// Chat message appended when the completion call failed on every attempt
pub fn service_unavailable(language: Language) -> &'static str {
    match language {
        Language::English => "Service unavailable. Please try again later.",
        Language::Spanish => "Servicio no disponible. Por favor, inténtelo más tarde.",
        Language::French => "Service indisponible. Veuillez réessayer plus tard.",
        Language::Arabic => "الخدمة غير متوفرة. يرجى المحاولة مرة أخرى لاحقًا.",
        Language::Hindi => "सेवा उपलब्ध नहीं है। कृपया बाद में पुनः प्रयास करें।",
        Language::Gujarati => "સેવા ઉપલબ્ધ નથી. કૃપા કરીને પછીથી ફરી પ્રયાસ કરો.",
    }
}

/// Drop a trailing disclaimer in any supported language
pub fn strip_disclaimer(text: &str) -> &str {
    Language::all()
        .iter()
        .find_map(|lang| text.strip_suffix(disclaimer(*lang)))
        .unwrap_or(text)
}
