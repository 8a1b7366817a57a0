//! Static choice encounter catalog.

use super::types::{ChoiceEncounter, ChoiceOption, ChoiceOutcome, Consequence, OutcomeKind, RiskLevel};
use crate::effects::{EffectTemplate, Polarity};
use crate::encounters::Rarity;
use crate::stones::Grade;

use super::types::Consequence::{
    BreakthroughGuidance as Guidance, Comprehension as Dao, Elemental as Element,
    Experience as Exp, Foundation, Stones,
};

pub fn choice_catalog() -> &'static [ChoiceEncounter] {
    &CHOICES
}

pub fn find_choice(name: &str) -> Option<&'static ChoiceEncounter> {
    CHOICES.iter().find(|choice| choice.name.eq_ignore_ascii_case(name))
}

const fn setback(name: &'static str, description: &'static str, exp_multiplier: f64, sessions: u32) -> Option<EffectTemplate> {
    Some(EffectTemplate {
        name,
        polarity: Polarity::Negative,
        description,
        exp_multiplier,
        duration: Some(sessions),
    })
}

const fn success(probability: f64, message: &'static str, consequences: &'static [Consequence]) -> ChoiceOutcome {
    ChoiceOutcome {
        kind: OutcomeKind::Success,
        probability,
        message,
        consequences,
        effect: None,
    }
}

const fn partial(probability: f64, message: &'static str, consequences: &'static [Consequence]) -> ChoiceOutcome {
    ChoiceOutcome {
        kind: OutcomeKind::Partial,
        probability,
        message,
        consequences,
        effect: None,
    }
}

const fn failure(
    probability: f64,
    message: &'static str,
    consequences: &'static [Consequence],
    effect: Option<EffectTemplate>,
) -> ChoiceOutcome {
    ChoiceOutcome {
        kind: OutcomeKind::Failure,
        probability,
        message,
        consequences,
        effect,
    }
}

static CHOICES: [ChoiceEncounter; 6] = [
    ChoiceEncounter {
        name: "Ancient Foundation Pill",
        description: "You discover an ancient pill radiating powerful foundation energy.",
        context: "The pill is clearly ancient and potent, but its effects on modern cultivators are unknown.",
        rarity: Rarity::Uncommon,
        options: &[
            ChoiceOption {
                description: "Consume it immediately for maximum benefit",
                risk: RiskLevel::High,
                outcomes: &[
                    success(0.7, "The pill's energy floods your meridians, greatly strengthening your foundation!", &[Foundation(15)]),
                    failure(
                        0.3,
                        "The ancient energy is too volatile. You suffer from pill poisoning.",
                        &[],
                        setback("Pill Poisoning", "Ancient pill energy disrupts your cultivation", 0.8, 5),
                    ),
                ],
            },
            ChoiceOption {
                description: "Study its composition carefully first",
                risk: RiskLevel::Low,
                outcomes: &[
                    success(0.9, "Careful study reveals the pill's secrets. You absorb its essence safely.", &[Foundation(8), Dao("balance", 2)]),
                    partial(0.1, "Your study takes too long and the pill's potency fades.", &[Foundation(3)]),
                ],
            },
            ChoiceOption {
                description: "Preserve it and sell it for spirit stones",
                risk: RiskLevel::Low,
                outcomes: &[success(1.0, "A collector pays handsomely for the ancient pill.", &[Stones(Grade::Mid, 3), Stones(Grade::High, 1)])],
            },
        ],
    },
    ChoiceEncounter {
        name: "Elemental Spirit Convergence",
        description: "Multiple elemental spirits gather around you, each offering its essence.",
        context: "Accepting one spirit's blessing may anger the others, but greater power awaits.",
        rarity: Rarity::Rare,
        options: &[
            ChoiceOption {
                description: "Accept the Fire Spirit's blessing",
                risk: RiskLevel::Medium,
                outcomes: &[success(1.0, "The Fire Spirit's essence burns within you.", &[Element("fire", 12), Dao("fire", 3)])],
            },
            ChoiceOption {
                description: "Accept the Water Spirit's blessing",
                risk: RiskLevel::Medium,
                outcomes: &[success(1.0, "The Water Spirit's essence flows through you.", &[Element("water", 12), Dao("water", 3)])],
            },
            ChoiceOption {
                description: "Accept the Earth Spirit's blessing",
                risk: RiskLevel::Medium,
                outcomes: &[success(1.0, "The Earth Spirit's essence grounds you.", &[Element("earth", 12), Foundation(8)])],
            },
            ChoiceOption {
                description: "Accept the Wind Spirit's blessing",
                risk: RiskLevel::Medium,
                outcomes: &[success(1.0, "The Wind Spirit's essence lifts your spirit.", &[Element("air", 12), Exp(20)])],
            },
            ChoiceOption {
                description: "Try to balance all elements at once",
                risk: RiskLevel::High,
                outcomes: &[
                    success(
                        0.4,
                        "You achieve perfect elemental harmony!",
                        &[Element("fire", 5), Element("water", 5), Element("earth", 5), Element("air", 5), Dao("balance", 8)],
                    ),
                    failure(
                        0.6,
                        "The conflicting energies overwhelm you.",
                        &[],
                        setback("Elemental Chaos", "Conflicting elemental energies disrupt cultivation", 0.7, 8),
                    ),
                ],
            },
        ],
    },
    ChoiceEncounter {
        name: "Mysterious Dao Monument",
        description: "An ancient monument inscribed with profound Dao insights stands before you.",
        context: "The monument contains multiple Dao paths, but comprehending them all may overwhelm your mind.",
        rarity: Rarity::Uncommon,
        options: &[
            ChoiceOption {
                description: "Focus on the Sword Dao inscriptions",
                risk: RiskLevel::Medium,
                outcomes: &[
                    success(0.8, "The sword intent in the inscriptions sharpens your understanding.", &[Dao("sword", 5)]),
                    failure(0.2, "The sword intent is too sharp for you to grasp.", &[], None),
                ],
            },
            ChoiceOption {
                description: "Study the Nature Dao patterns",
                risk: RiskLevel::Medium,
                outcomes: &[
                    success(0.8, "You feel the flow of natural law within the carvings.", &[Dao("nature", 5), Foundation(5)]),
                    failure(0.2, "The patterns remain a mystery to you.", &[], None),
                ],
            },
            ChoiceOption {
                description: "Attempt to comprehend the Destruction Dao",
                risk: RiskLevel::High,
                outcomes: &[
                    success(0.6, "You glimpse the terrible beauty of destruction.", &[Dao("destruction", 8), Exp(25)]),
                    failure(
                        0.4,
                        "The destructive intent lashes back at your mind.",
                        &[],
                        setback("Dao Backlash", "Destruction intent wounds your mind", 0.85, 6),
                    ),
                ],
            },
            ChoiceOption {
                description: "Try to understand all the inscriptions",
                risk: RiskLevel::High,
                outcomes: &[
                    success(
                        0.3,
                        "The inscriptions open to you one after another!",
                        &[Dao("sword", 2), Dao("nature", 2), Dao("destruction", 2), Dao("balance", 4)],
                    ),
                    partial(0.5, "You grasp fragments of the monument's teachings.", &[Dao("balance", 2)]),
                    failure(
                        0.2,
                        "Too many insights at once leave your mind exhausted.",
                        &[],
                        setback("Mental Exhaustion", "Your mind needs rest after the monument", 0.9, 4),
                    ),
                ],
            },
        ],
    },
    ChoiceEncounter {
        name: "Spirit Stone Mine Discovery",
        description: "You stumble upon an untouched spirit stone vein.",
        context: "The vein is protected by an old formation that may collapse if disturbed.",
        rarity: Rarity::Common,
        options: &[
            ChoiceOption {
                description: "Mine aggressively before anyone else arrives",
                risk: RiskLevel::High,
                outcomes: &[
                    success(
                        0.6,
                        "You extract a fortune in spirit stones!",
                        &[Stones(Grade::Low, 8), Stones(Grade::Mid, 3), Stones(Grade::High, 1)],
                    ),
                    failure(
                        0.4,
                        "The formation collapses. You escape with a handful of stones and some injuries.",
                        &[Stones(Grade::Low, 2)],
                        setback("Mining Injuries", "Wounds from the collapsing formation", 0.8, 6),
                    ),
                ],
            },
            ChoiceOption {
                description: "Mine carefully around the formation",
                risk: RiskLevel::Low,
                outcomes: &[
                    success(0.9, "Patient work yields a steady haul.", &[Stones(Grade::Low, 5), Stones(Grade::Mid, 1)]),
                    partial(0.1, "The vein is thinner than it looked.", &[Stones(Grade::Low, 1)]),
                ],
            },
            ChoiceOption {
                description: "Study the protective formation first",
                risk: RiskLevel::Medium,
                outcomes: &[
                    success(
                        0.8,
                        "Understanding the formation lets you mine safely and learn from it.",
                        &[Stones(Grade::Low, 3), Stones(Grade::Mid, 2), Dao("earth", 2)],
                    ),
                    partial(0.2, "The formation's secrets elude you, though its earth energy lingers.", &[Dao("earth", 1)]),
                ],
            },
        ],
    },
    ChoiceEncounter {
        name: "Senior Cultivator's Guidance",
        description: "A senior cultivator notices your efforts and offers a moment of their time.",
        context: "Seniors are unpredictable. Their guidance can be invaluable, or their patience short.",
        rarity: Rarity::Rare,
        options: &[
            ChoiceOption {
                description: "Humbly request guidance on your breakthrough",
                risk: RiskLevel::Low,
                outcomes: &[
                    success(
                        0.8,
                        "The senior points out flaws in your foundation and the path ahead.",
                        &[Foundation(10), Guidance(0.15), Dao("balance", 3)],
                    ),
                    failure(0.2, "The senior is busy and waves you away.", &[], None),
                ],
            },
            ChoiceOption {
                description: "Challenge them to a friendly spar",
                risk: RiskLevel::High,
                outcomes: &[
                    success(
                        0.3,
                        "You hold your own, earning the senior's respect and insight!",
                        &[Exp(50), Dao("sword", 5), Dao("destruction", 3), Foundation(8)],
                    ),
                    failure(
                        0.7,
                        "The senior easily defeats you, and your confidence suffers.",
                        &[],
                        setback("Cultivation Setback", "A crushing defeat shakes your resolve", 0.7, 10),
                    ),
                ],
            },
            ChoiceOption {
                description: "Offer to exchange cultivation insights",
                risk: RiskLevel::Medium,
                outcomes: &[
                    success(0.6, "A fruitful exchange. The senior even gifts you some stones.", &[Dao("balance", 2), Stones(Grade::Mid, 2)]),
                    partial(0.3, "The senior shares a little of their understanding.", &[Dao("balance", 1)]),
                    failure(0.1, "You have little to offer and the conversation ends quickly.", &[], None),
                ],
            },
            ChoiceOption {
                description: "Quietly observe their cultivation technique",
                risk: RiskLevel::Medium,
                outcomes: &[
                    success(0.5, "You glean subtle techniques from watching.", &[Dao("shadow", 4), Dao("balance", 2), Exp(15)]),
                    failure(
                        0.5,
                        "The senior notices and is displeased by your spying.",
                        &[],
                        setback("Senior's Displeasure", "A senior's cold gaze weighs on you", 0.85, 7),
                    ),
                ],
            },
        ],
    },
    ChoiceEncounter {
        name: "Natural Lightning Formation",
        description: "A natural formation crackles with heavenly lightning.",
        context: "Lightning can temper a foundation or scar it beyond repair.",
        rarity: Rarity::Uncommon,
        options: &[
            ChoiceOption {
                description: "Cultivate inside the lightning",
                risk: RiskLevel::High,
                outcomes: &[
                    success(0.4, "The lightning tempers your body and foundation!", &[Foundation(15), Element("lightning", 10)]),
                    failure(
                        0.6,
                        "The lightning tears through your meridians.",
                        &[Foundation(-5)],
                        setback("Lightning Scars", "Lightning burns still crackle in your meridians", 0.6, 12),
                    ),
                ],
            },
            ChoiceOption {
                description: "Cultivate at the edge of the formation",
                risk: RiskLevel::Medium,
                outcomes: &[
                    success(
                        0.8,
                        "Controlled exposure strengthens you steadily.",
                        &[Foundation(6), Element("lightning", 5), Dao("lightning", 2)],
                    ),
                    failure(
                        0.2,
                        "A stray bolt catches you.",
                        &[],
                        setback("Minor Lightning Burns", "Small burns sting as you cultivate", 0.9, 4),
                    ),
                ],
            },
            ChoiceOption {
                description: "Study the formation from a safe distance",
                risk: RiskLevel::Low,
                outcomes: &[
                    success(0.9, "You comprehend the lightning's patterns.", &[Dao("lightning", 4), Dao("balance", 2), Exp(20)]),
                    failure(0.1, "The patterns shift too fast to follow.", &[], None),
                ],
            },
        ],
    },
];
