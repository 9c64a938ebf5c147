//! Story content addressed by `(timeline, progress)`.
//!
//! The controller only counts beats; what a beat says, which choices it
//! offers and which clue it hands out live behind [`StoryRepository`].

use quantum_types::{Evidence, EvidenceId, NonEmptyString, Timeline};

/// Source of story beats.
pub trait StoryRepository {
    /// The beat shown at `progress` in `timeline`, or `None` once the
    /// timeline has no more content.
    fn lookup(&self, timeline: Timeline, progress: u32) -> Option<StoryBeat>;

    fn is_exhausted(&self, timeline: Timeline, progress: u32) -> bool {
        self.lookup(timeline, progress).is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoryChoice {
    pub id: &'static str,
    pub text: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Clue {
    id: &'static str,
    name: &'static str,
    description: &'static str,
}

/// A puzzle gate inside a beat. Solving it grants a reward clue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Challenge {
    pub task: &'static str,
    pub description: &'static str,
    pub puzzle: &'static str,
    pub solution: &'static str,
    pub reward: &'static str,
}

impl Challenge {
    /// Compare an answer with the solution. Case, surrounding whitespace and
    /// the difference between `_` and a space are ignored.
    #[must_use]
    pub fn check(&self, answer: &str) -> bool {
        normalize_answer(answer) == normalize_answer(self.solution)
    }

    /// Clue granted for solving this challenge at `(timeline, progress)`.
    #[must_use]
    pub fn reward_evidence(&self, timeline: Timeline, progress: u32) -> Evidence {
        let id = format!("adventure_{timeline}_{progress}");
        Evidence::new(
            EvidenceId::new(id).expect("timeline names contain no whitespace"),
            NonEmptyString::new(self.reward).expect("challenge rewards are non-empty"),
            format!("Earned through completing: {}", self.task),
        )
        .with_timeline(timeline)
    }
}

fn normalize_answer(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .replace('_', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoryBeat {
    pub title: &'static str,
    pub body: &'static str,
    pub choices: &'static [StoryChoice],
    clue: Option<Clue>,
    pub challenge: Option<Challenge>,
}

impl StoryBeat {
    /// The clue this beat reveals, if any.
    #[must_use]
    pub fn evidence(&self) -> Option<Evidence> {
        self.clue
            .map(|c| Evidence::from_static(c.id, c.name, c.description))
    }

    #[must_use]
    pub fn find_choice(&self, id: &str) -> Option<&'static StoryChoice> {
        self.choices.iter().find(|c| c.id == id)
    }

    /// Accept either a choice id or its 1-based position.
    #[must_use]
    pub fn resolve_choice(&self, input: &str) -> Option<&'static StoryChoice> {
        let input = input.trim();
        if let Some(choice) = self.find_choice(input) {
            return Some(choice);
        }
        let n: usize = input.parse().ok()?;
        self.choices.get(n.checked_sub(1)?)
    }
}

/// The shipped case: the death of Marcus Vrain across four realities.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinStory;

impl BuiltinStory {
    #[must_use]
    pub fn beats(timeline: Timeline) -> &'static [StoryBeat] {
        match timeline {
            Timeline::Alpha => ALPHA,
            Timeline::Beta => BETA,
            Timeline::Gamma => GAMMA,
            Timeline::Delta => DELTA,
        }
    }
}

impl StoryRepository for BuiltinStory {
    fn lookup(&self, timeline: Timeline, progress: u32) -> Option<StoryBeat> {
        let index = usize::try_from(progress).ok()?;
        Self::beats(timeline).get(index).copied()
    }
}

macro_rules! choices {
    ($($id:literal => $text:literal),* $(,)?) => {
        &[$(StoryChoice { id: $id, text: $text }),*]
    };
}

const fn clue(id: &'static str, name: &'static str, description: &'static str) -> Option<Clue> {
    Some(Clue {
        id,
        name,
        description,
    })
}

const ALPHA: &[StoryBeat] = &[
    StoryBeat {
        title: "Corporate Shadows",
        body: "You stand in the gleaming lobby of NeoTech Industries. The body of CEO Marcus Vrain \
               lies slumped over his desk on the 50th floor. Security footage shows no one \
               entering or leaving his office after 6 PM. The official report calls it suicide, \
               but something doesn't add up...",
        choices: choices![
            "examine_body" => "Examine the body closely",
            "check_security" => "Review security systems",
            "interview_secretary" => "Question his secretary",
        ],
        clue: clue(
            "suicide_note_alpha",
            "Suicide Note",
            "A typed note claiming responsibility",
        ),
        challenge: None,
    },
    StoryBeat {
        title: "The Executive Suite",
        body: "Marcus Vrain's office is pristine, almost too clean. His computer is still logged \
               in, showing recent stock transactions worth millions. A coffee cup sits cold on \
               his desk, lipstick stain on the rim - but Vrain lived alone...",
        choices: choices![
            "analyze_computer" => "Investigate the computer",
            "examine_coffee" => "Test the coffee cup",
            "search_office" => "Search for hidden compartments",
        ],
        clue: clue(
            "lipstick_cup_alpha",
            "Coffee Cup",
            "Contains traces of an unknown lipstick",
        ),
        challenge: Some(Challenge {
            task: "HACKING CHALLENGE",
            description: "Decode the encrypted financial records",
            puzzle: "Binary sequence: 01010001 01010101 01000001 01001110 01010100 01010101 \
                     01001101",
            solution: "QUANTUM",
            reward: "Advanced Evidence: Hidden Offshore Account",
        }),
    },
    StoryBeat {
        title: "Digital Forensics",
        body: "You've accessed Vrain's computer systems. The financial records reveal a complex \
               web of transactions, but one catches your eye - a massive transfer scheduled for \
               tomorrow morning. Someone was planning to drain the company accounts. The killer \
               might have been after more than just Vrain's life...",
        choices: choices![
            "trace_transaction" => "Trace the suspicious transaction",
            "check_emails" => "Examine recent emails",
            "forensic_analysis" => "Run deep forensic scan",
        ],
        clue: clue(
            "financial_records_alpha",
            "Financial Records",
            "Suspicious $50M transfer scheduled",
        ),
        challenge: None,
    },
    StoryBeat {
        title: "The Email Trail",
        body: "The email trace reveals encrypted communications with someone code-named \
               'Phoenix'. The messages reference a hostile takeover and mention eliminating \
               obstacles. But there's something odd - the emails were sent after Vrain's death. \
               Someone else has access to his accounts...",
        choices: choices![
            "decrypt_phoenix" => "Decrypt Phoenix communications",
            "trace_ip" => "Trace IP addresses",
            "examine_timestamps" => "Analyze message timestamps",
        ],
        clue: clue(
            "phoenix_emails_alpha",
            "Phoenix Communications",
            "Encrypted emails sent after death",
        ),
        challenge: None,
    },
    StoryBeat {
        title: "Phoenix Rising",
        body: "The decryption reveals Phoenix's true identity - Margaret Chen, Vrain's business \
               partner and the company's CTO. The timestamps show she was accessing his email \
               remotely during a board meeting with 20 witnesses. She couldn't have killed him \
               physically, but she's clearly involved. The corporate espionage goes deeper than \
               murder...",
        choices: choices![
            "confront_chen" => "Confront Margaret Chen",
            "examine_partnership" => "Investigate their partnership",
            "board_meeting_alibi" => "Verify board meeting alibi",
        ],
        clue: clue(
            "chen_identity_alpha",
            "Phoenix Identity",
            "Margaret Chen = Phoenix code name",
        ),
        challenge: Some(Challenge {
            task: "CORPORATE INFILTRATION",
            description: "Analyze the partnership documents for hidden clauses",
            puzzle: "Which clause gives Chen control if Vrain dies? A) Asset Transfer \
                     B) Succession Rights C) Insurance Beneficiary D) Voting Control",
            solution: "B",
            reward: "Hidden Partnership Secret",
        }),
    },
    StoryBeat {
        title: "The Final Confrontation",
        body: "In Chen's office, you find the murder weapon - a syringe containing untraceable \
               poison. Chen admits to the corporate conspiracy but swears she didn't kill Vrain. \
               'Someone beat me to it,' she says. 'I was going to ruin him financially, not \
               murder him.' The real killer used her plan as cover. But who had access to both \
               their offices?",
        choices: choices![
            "security_access" => "Check security access logs",
            "janitor_investigation" => "Interview cleaning staff",
            "chen_cooperation" => "Get Chen to cooperate",
        ],
        clue: clue(
            "poison_syringe_alpha",
            "Poison Syringe",
            "Untraceable compound, Chen's fingerprints",
        ),
        challenge: None,
    },
];

const BETA: &[StoryBeat] = &[
    StoryBeat {
        title: "Family Secrets",
        body: "The same office, but in this reality, family photos line Marcus Vrain's desk. His \
               estranged daughter had recently returned to his life. The murder weapon - a \
               letter opener - bears her fingerprints, but she has an alibi...",
        choices: choices![
            "examine_photos" => "Study the family photos",
            "check_alibi" => "Verify daughter's alibi",
            "analyze_weapon" => "Examine the letter opener",
        ],
        clue: clue(
            "family_photo_beta",
            "Family Photo",
            "Recent photo showing reconciliation",
        ),
        challenge: None,
    },
    StoryBeat {
        title: "Blood Relations",
        body: "Sarah Vrain's alibi checks out - she was at a charity gala with 200 witnesses. Yet \
               her fingerprints are on the murder weapon. Security cameras show her leaving the \
               building at 5 PM, an hour before the estimated time of death...",
        choices: choices![
            "gala_investigation" => "Investigate the charity gala",
            "timeline_analysis" => "Analyze the timeline",
            "fingerprint_expert" => "Consult fingerprint expert",
        ],
        clue: clue(
            "gala_ticket_beta",
            "Charity Gala Ticket",
            "Timestamped entry at 6:30 PM",
        ),
        challenge: Some(Challenge {
            task: "TIME PARADOX PUZZLE",
            description: "Solve the impossible timeline",
            puzzle: "If Sarah left at 5 PM and death occurred at 6 PM, but she was at the gala \
                     at 6:30 PM, how is this possible?",
            solution: "TWIN_SISTER",
            reward: "Breakthrough: Twin Sister Theory",
        }),
    },
];

const GAMMA: &[StoryBeat] = &[
    StoryBeat {
        title: "Underground Connections",
        body: "In this timeline, Marcus Vrain wasn't just a CEO - he was laundering money for the \
               Shadow Syndicate. His office shows signs of a struggle. The murder appears \
               professional, but one detail seems deliberately planted...",
        choices: choices![
            "examine_struggle" => "Analyze signs of struggle",
            "trace_money" => "Follow the money trail",
            "syndicate_contacts" => "Investigate syndicate connections",
        ],
        clue: clue(
            "planted_evidence_gamma",
            "Syndicate Card",
            "Too obviously placed calling card",
        ),
        challenge: None,
    },
    StoryBeat {
        title: "Shadow Games",
        body: "The money trail leads to offshore accounts and encrypted communications. Vrain was \
               preparing to testify against the Shadow Syndicate. But the planted evidence \
               suggests someone wanted it to look like a syndicate hit...",
        choices: choices![
            "decrypt_communications" => "Decrypt the messages",
            "witness_protection" => "Check witness protection records",
            "double_agent" => "Look for double agents",
        ],
        clue: clue(
            "encrypted_message_gamma",
            "Encrypted Message",
            "References 'The Cleaner'",
        ),
        challenge: Some(Challenge {
            task: "DECRYPTION CHALLENGE",
            description: "Crack the syndicate's code",
            puzzle: "Caesar cipher with shift 13: 'GUR PYRNAYRE VF PBZVAT'",
            solution: "THE CLEANER IS COMING",
            reward: "Urgent Intel: Assassin Incoming",
        }),
    },
];

const DELTA: &[StoryBeat] = &[
    StoryBeat {
        title: "Quantum Echoes",
        body: "In this final timeline, you begin to see the truth. Marcus Vrain exists in all \
               realities, but so does his killer. Someone with access to quantum technology has \
               been manipulating events across timelines. The real question is: who has this \
               technology?",
        choices: choices![
            "quantum_analysis" => "Analyze quantum signatures",
            "technology_source" => "Trace the quantum technology",
            "interdimensional_evidence" => "Compare evidence across timelines",
        ],
        clue: clue(
            "quantum_signature_delta",
            "Quantum Residue",
            "Traces of interdimensional activity",
        ),
        challenge: None,
    },
    StoryBeat {
        title: "The Final Truth",
        body: "The quantum signatures match those of another detective - your predecessor who \
               disappeared six months ago. Detective Ray Morrison had access to the same quantum \
               jumping technology. But if he's the killer... who's been sending you these cases?",
        choices: choices![
            "confront_morrison" => "Confront Detective Morrison",
            "trace_case_source" => "Find who assigned this case",
            "quantum_trap" => "Set a quantum trap",
        ],
        clue: clue(
            "morrison_badge_delta",
            "Detective Badge",
            "Ray Morrison's missing badge",
        ),
        challenge: Some(Challenge {
            task: "FINAL CONFRONTATION",
            description: "Choose your strategy wisely",
            puzzle: "Three paths diverge: Force, Deception, or Truth. Which will expose the \
                     quantum killer?",
            solution: "TRUTH",
            reward: "Case Solved: The Quantum Conspiracy",
        }),
    },
];
