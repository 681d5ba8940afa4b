use serde::{Deserialize, Serialize};

/// Qualitative orientation suggested by the threshold rules. Not a diagnosis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileLabel {
    Hpi,
    Tdah,
    Tsa,
    DoubleExceptionality,
    Neurotypical,
    Nuanced,
}

impl ProfileLabel {
    pub const fn code(self) -> &'static str {
        match self {
            Self::Hpi => "HPI",
            Self::Tdah => "TDAH",
            Self::Tsa => "TSA",
            Self::DoubleExceptionality => "2E",
            Self::Neurotypical => "NT",
            Self::Nuanced => "Nuancé",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Hpi => "Haut potentiel intellectuel",
            Self::Tdah => "Trouble du déficit de l’attention avec ou sans hyperactivité",
            Self::Tsa => "Trouble du spectre de l’autisme",
            Self::DoubleExceptionality => "Double exceptionnalité",
            Self::Neurotypical => "Neurotypique",
            Self::Nuanced => "Profil nuancé",
        }
    }

    pub const fn explanation(self) -> &'static str {
        match self {
            Self::Hpi => {
                "Traitement de l’information global et rapide, créativité et intuition \
                 marquées, forte intensité émotionnelle."
            }
            Self::Tdah => {
                "Difficultés attentionnelles marquées : décrochages, distractibilité, \
                 tâches laissées inachevées."
            }
            Self::Tsa => {
                "Particularités sociales et sensorielles marquées : compréhension littérale, \
                 sensibilité au bruit, à la lumière ou aux textures."
            }
            Self::DoubleExceptionality => {
                "Haut potentiel associé à des fragilités : réussites et difficultés \
                 coexistent et se masquent mutuellement."
            }
            Self::Neurotypical => {
                "Aucune dimension ne ressort de façon marquée : fonctionnement \
                 neurotypique probable."
            }
            Self::Nuanced => {
                "Aucun profil type ne se dégage clairement : nécessite une interprétation \
                 clinique."
            }
        }
    }

    /// Single-line rendering used in reports: `CODE (title) : explanation`.
    pub fn summary(self) -> String {
        format!("{} ({}) : {}", self.code(), self.title(), self.explanation())
    }
}
