use super::normalizer::normalize_label;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

pub const DIMENSION_COUNT: usize = 8;
pub const ITEMS_PER_DIMENSION: usize = 10;
pub const LIKERT_MIN: u8 = 0;
pub const LIKERT_MAX: u8 = 4;

/// Stable identity of a questionnaire dimension, independent of its display label.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum DimensionId {
    D1,
    D2,
    D3,
    D4,
    D5,
    D6,
    D7,
    D8,
}

impl DimensionId {
    pub const fn ordered() -> [Self; DIMENSION_COUNT] {
        [
            Self::D1,
            Self::D2,
            Self::D3,
            Self::D4,
            Self::D5,
            Self::D6,
            Self::D7,
            Self::D8,
        ]
    }

    /// Zero-based position in the catalog.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::D1 => "D1",
            Self::D2 => "D2",
            Self::D3 => "D3",
            Self::D4 => "D4",
            Self::D5 => "D5",
            Self::D6 => "D6",
            Self::D7 => "D7",
            Self::D8 => "D8",
        }
    }

    pub fn label(self) -> &'static str {
        CATALOG[self.index()].label
    }

    pub fn dimension(self) -> &'static Dimension {
        &CATALOG[self.index()]
    }

    /// Resolves a stable code (`D5`) or a display label in any known spelling
    /// (`D5 - Emotions et regulation`) to its dimension.
    pub fn resolve(value: &str) -> Option<Self> {
        dimension_key_map().get(&normalize_label(value)).copied()
    }
}

impl fmt::Display for DimensionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A questionnaire dimension and its ten situation-based prompts.
#[derive(Debug, Serialize)]
pub struct Dimension {
    pub id: DimensionId,
    pub label: &'static str,
    pub items: [&'static str; ITEMS_PER_DIMENSION],
}

impl Dimension {
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

/// One point of the response scale.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ScalePoint {
    pub value: u8,
    pub label: &'static str,
}

pub const LIKERT_SCALE: [ScalePoint; 5] = [
    ScalePoint {
        value: 0,
        label: "Jamais",
    },
    ScalePoint {
        value: 1,
        label: "Rarement",
    },
    ScalePoint {
        value: 2,
        label: "Parfois",
    },
    ScalePoint {
        value: 3,
        label: "Souvent",
    },
    ScalePoint {
        value: 4,
        label: "Toujours",
    },
];

pub fn catalog() -> &'static [Dimension; DIMENSION_COUNT] {
    &CATALOG
}

static DIMENSION_KEY_MAP: OnceLock<HashMap<String, DimensionId>> = OnceLock::new();

fn dimension_key_map() -> &'static HashMap<String, DimensionId> {
    DIMENSION_KEY_MAP.get_or_init(|| {
        // Spellings seen in exported score tables besides the canonical labels.
        const KNOWN_VARIANTS: &[(&str, DimensionId)] = &[
            ("D1 - Traitement de l information", DimensionId::D1),
            ("D4 - Cognition sociale & communication", DimensionId::D4),
        ];

        let mut map = HashMap::new();
        for dimension in CATALOG.iter() {
            map.insert(normalize_label(dimension.id.code()), dimension.id);
            map.insert(normalize_label(dimension.label), dimension.id);
        }
        for (variant, id) in KNOWN_VARIANTS {
            map.insert(normalize_label(variant), *id);
        }
        map
    })
}

static CATALOG: [Dimension; DIMENSION_COUNT] = [
    Dimension {
        id: DimensionId::D1,
        label: "D1 - Traitement de l’information",
        items: TRAITEMENT_ITEMS,
    },
    Dimension {
        id: DimensionId::D2,
        label: "D2 - Sensorialité",
        items: SENSORIALITE_ITEMS,
    },
    Dimension {
        id: DimensionId::D3,
        label: "D3 - Attention et concentration",
        items: ATTENTION_ITEMS,
    },
    Dimension {
        id: DimensionId::D4,
        label: "D4 - Cognition sociale et communication",
        items: COGNITION_SOCIALE_ITEMS,
    },
    Dimension {
        id: DimensionId::D5,
        label: "D5 - Émotions et régulation",
        items: EMOTIONS_ITEMS,
    },
    Dimension {
        id: DimensionId::D6,
        label: "D6 - Créativité et intuition",
        items: CREATIVITE_ITEMS,
    },
    Dimension {
        id: DimensionId::D7,
        label: "D7 - Double exceptionnalité",
        items: DOUBLE_EXCEPTIONNALITE_ITEMS,
    },
    Dimension {
        id: DimensionId::D8,
        label: "D8 - Temporalité et rythmes",
        items: TEMPORALITE_ITEMS,
    },
];

const TRAITEMENT_ITEMS: [&str; ITEMS_PER_DIMENSION] = [
    "Quand on me donne une règle ou une consigne, je cherche d’abord à comprendre sa logique globale avant de l’appliquer.",
    "Quand quelqu’un me raconte un événement, plusieurs images et idées apparaissent en même temps dans ma tête.",
    "Face à un problème, plusieurs solutions possibles surgissent spontanément, sans effort conscient.",
    "Pendant une réunion, j’ai souvent l’impression de voir rapidement la conclusion, avant que les autres n’y arrivent.",
    "Quand on me donne une liste de tâches, je préfère les faire dans l’ordre exact où elles ont été données.",
    "Je progresse étape par étape, en terminant une partie avant de passer à la suivante.",
    "Pour résoudre un problème, j’applique d’abord les méthodes apprises et connues.",
    "Quand une explication est longue et détaillée, je perds le fil et je ne sais plus quel était le point principal.",
    "Quand on me donne une consigne complexe, j’oublie parfois une partie ou je mélange les étapes.",
    "Quand on me demande quelque chose de précis, je l’exécute exactement comme cela a été dit, même si cela paraît inhabituel.",
];

const SENSORIALITE_ITEMS: [&str; ITEMS_PER_DIMENSION] = [
    "Dans une cantine bruyante, les conversations et les bruits se mélangent et je n’arrive plus à suivre mon interlocuteur.",
    "Une couture ou une étiquette de vêtement peut m’empêcher de le porter.",
    "Après un moment dans une pièce éclairée au néon, je me sens fatigué(e) ou irrité(e).",
    "Je remarque immédiatement un changement minime de goût ou d’odeur dans un aliment.",
    "Après une journée en ville, j’ai besoin de silence pour retrouver mon équilibre.",
    "Quand plusieurs personnes parlent en même temps, je perds le fil de la discussion.",
    "Pour me sentir bien, j’ai parfois besoin de musique forte, de bouger ou de rechercher des sensations intenses.",
    "Quand une porte claque, je sursaute fortement, parfois avec une réaction physique marquée.",
    "Une odeur persistante peut me rester longtemps en tête.",
    "Dans un repas ou une soirée animée, je remarque le bruit et la lumière, mais je m’y adapte sans gêne particulière.",
];

const ATTENTION_ITEMS: [&str; ITEMS_PER_DIMENSION] = [
    "Quand je travaille, un bruit soudain me détourne et je perds le fil de ce que je faisais.",
    "Quand je parle avec quelqu’un, un détail déclenche des associations d’idées tout en continuant la conversation.",
    "Quand je lis, je peux interrompre et reprendre plus tard sans difficulté.",
    "Enfant, j’oubliais mes devoirs ou je les laissais inachevés malgré mes efforts.",
    "Quand une activité me passionne, je peux oublier de manger ou de dormir.",
    "Pendant une réunion, j’écoute tout en préparant une idée parallèle à présenter.",
    "Quand je cuisine, je reste attentif(ve) et je reprends sans effort après une interruption.",
    "En conversation, je décroche parfois en plein milieu d’une phrase.",
    "En cours, je comprends vite puis je décroche par ennui.",
    "Quand on me donne une consigne claire, je la suis jusqu’au bout et je reprends facilement après une interruption.",
];

const COGNITION_SOCIALE_ITEMS: [&str; ITEMS_PER_DIMENSION] = [
    "Quand on me dit « reviens dans 5 minutes », je prends cela au mot près et je suis contrarié(e) si ce n’est pas respecté.",
    "Quand quelqu’un ne tient pas sa parole, je le vis comme un manquement à une valeur.",
    "Quand on me dit « reviens dans 5 minutes », je comprends que cela signifie « un peu plus tard ».",
    "Je prends souvent les phrases au pied de la lettre et l’ironie m’échappe.",
    "Après une soirée, je repense longtemps aux conversations.",
    "Dans un dîner, je comprends les sous-entendus et je passe à autre chose.",
    "Si une règle sociale n’est pas respectée (prévenir d’un retard), je ressens une gêne importante.",
    "Une blague à double sens peut me déstabiliser.",
    "Je préfère discuter en petit comité qu’en grand groupe.",
    "Je participe avec aisance à des conversations légères.",
];

const EMOTIONS_ITEMS: [&str; ITEMS_PER_DIMENSION] = [
    "Une remarque peut rester longtemps dans mon esprit.",
    "Face à une injustice, ma réaction est immédiate et intense.",
    "Une émotion forte m’empêche parfois d’agir ou de réfléchir clairement.",
    "Mon stress s’exprime physiquement (maux de ventre, tensions, migraines).",
    "Quand un ami est triste, je ressens son émotion dans mon corps.",
    "Mon humeur peut changer brutalement dans la journée.",
    "Après une dispute, je revis la scène longtemps dans ma tête.",
    "Après une rencontre sociale, j’ai besoin de temps seul(e) pour récupérer.",
    "Dans certaines situations, j’ai du mal à identifier clairement mon émotion.",
    "Après une contrariété, j’arrive à passer vite à autre chose.",
];

const CREATIVITE_ITEMS: [&str; ITEMS_PER_DIMENSION] = [
    "En marchant ou en conduisant, une solution complète peut surgir sans effort.",
    "En rencontrant quelqu’un, j’ai une impression immédiate de sa personnalité.",
    "Quand je cherche une idée, je relie spontanément des domaines très différents.",
    "Mon imagination produit facilement des images ou des histoires détaillées.",
    "Mes rêves sont longs et très clairs, comme un film.",
    "En entrant dans un lieu, je ressens parfois une ambiance particulière.",
    "J’invente facilement une nouvelle manière d’accomplir une tâche.",
    "Pour décider, je sens parfois un “oui” ou un “non” intérieur évident.",
    "Je commence souvent par appliquer une méthode connue et éprouvée.",
    "Quand on me demande une solution, je propose d’abord ce qui me paraît logique et déjà testé.",
];

const DOUBLE_EXCEPTIONNALITE_ITEMS: [&str; ITEMS_PER_DIMENSION] = [
    "Je réussis un exercice complexe mais j’échoue parfois sur une tâche simple.",
    "Mes notes ou résultats varient beaucoup selon les domaines.",
    "On m’a décrit comme « brillant(e) mais inconstant(e) ».",
    "Même après une réussite, je doute d’être vraiment compétent(e).",
    "Je dépense beaucoup d’énergie pour compenser certaines difficultés.",
    "Mes forces cachent mes fragilités, ou l’inverse.",
    "Après une journée d’efforts, je me sens épuisé(e) mentalement.",
    "Mon parcours alterne périodes de grande réussite et d’échec marqué.",
    "J’ai parfois été mal orienté(e) car on a jugé une partie de mon profil seulement.",
    "On me perçoit parfois comme exceptionnel(le), parfois comme en difficulté, selon le contexte.",
];

const TEMPORALITE_ITEMS: [&str; ITEMS_PER_DIMENSION] = [
    "Je fais souvent mes tâches à la dernière minute et je réussis dans l’urgence.",
    "Absorbé(e) par une activité, je perds complètement la notion du temps.",
    "Je préfère avancer sur plusieurs projets en parallèle plutôt que d’en finir un seul.",
    "Un changement de programme de dernière minute me perturbe longtemps.",
    "J’alterne entre périodes de grande activité et moments où je n’arrive plus à avancer.",
    "J’ai du mal à estimer le temps que prendra une tâche et je suis souvent en retard.",
    "Quand j’ai de l’avance, je perds la motivation et j’attends le moment de l’urgence.",
    "Dans une réunion, je comprends la conclusion avant la fin et je m’impatiente.",
    "Quand on me donne une consigne simple avec un début et une fin clairs, je l’exécute sans me disperser.",
    "Je m’adapte sans difficulté à une routine stable avec des horaires fixes.",
];
