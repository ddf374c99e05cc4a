//! Card model and trait implementations.

use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Serialize;

use crate::client::MingleClient;
use crate::error::{MingleError, Result};
use crate::pagination::{Page, PaginationParams, PAGE_SIZE};
use crate::traits::List;

/// Name of the property holding a card's current workflow status.
pub const STATUS_PROPERTY: &str = "Status";

/// Prefix shared by the properties recording when a card entered a stage.
pub const MOVED_TO_PREFIX: &str = "Moved to";

/// A Mingle card (one work item).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    /// Card number, unique within a project.
    pub number: u64,
    /// Card title.
    pub name: String,
    /// Card type name (e.g., "Story", "Defect").
    #[serde(rename = "type")]
    pub card_type: String,
    /// Card properties in the order Mingle returned them.
    pub properties: Vec<Property>,
}

/// A named property value attached to a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Property {
    pub name: String,
    /// Raw value; may carry surrounding spaces.
    pub value: String,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// The value with leading and trailing spaces removed.
    pub fn trimmed_value(&self) -> &str {
        self.value.trim_matches(' ')
    }
}

impl Card {
    /// First property with exactly this name.
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// The card's current status, if it has one.
    pub fn status(&self) -> Option<&Property> {
        self.property(STATUS_PROPERTY)
    }

    /// Stage entry properties ("Moved to ... on") in source order.
    pub fn stage_transitions(&self) -> impl Iterator<Item = &Property> {
        self.properties
            .iter()
            .filter(|p| p.name.starts_with(MOVED_TO_PREFIX))
    }
}

/// Card attribute the listing is sorted by.
const SORT_ATTRIBUTE: &str = "number";

/// Sort direction of the listing.
const SORT_ORDER: &str = "ASC";

// XML wire format. Text is kept exactly as received; attributes and
// elements other than the ones read below are ignored.

/// One open element while walking the document.
struct Frame {
    name: String,
    text: String,
    has_children: bool,
}

#[derive(Default)]
struct CardBuilder {
    number: Option<u64>,
    name: String,
    card_type: String,
    properties: Vec<Property>,
    property: Option<Property>,
}

impl CardBuilder {
    fn build(self) -> Result<Card> {
        let number = self
            .number
            .ok_or_else(|| MingleError::ParseError("card without a number".to_string()))?;
        Ok(Card {
            number,
            name: self.name,
            card_type: self.card_type,
            properties: self.properties,
        })
    }
}

/// Parse a `cards.xml` document.
pub(crate) fn parse_cards(xml: &str) -> Result<Vec<Card>> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Frame> = Vec::new();
    let mut current: Option<CardBuilder> = None;
    let mut cards = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                open_element(&mut stack, &mut current, name);
            }
            Event::Empty(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                open_element(&mut stack, &mut current, name);
                close_element(&mut stack, &mut current, &mut cards)?;
            }
            Event::Text(t) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&t.unescape()?);
                }
            }
            Event::CData(c) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Event::End(_) => close_element(&mut stack, &mut current, &mut cards)?,
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(MingleError::ParseError(
            "unexpected end of document".to_string(),
        ));
    }
    Ok(cards)
}

fn open_element(stack: &mut Vec<Frame>, current: &mut Option<CardBuilder>, name: String) {
    if let Some(parent) = stack.last_mut() {
        parent.has_children = true;
    }

    let path: Vec<&str> = stack.iter().skip(1).map(|f| f.name.as_str()).collect();
    match (path.as_slice(), name.as_str()) {
        ([], "card") if !stack.is_empty() => *current = Some(CardBuilder::default()),
        (["card", "properties"], "property") => {
            if let Some(card) = current.as_mut() {
                card.property = Some(Property::new("", ""));
            }
        }
        _ => {}
    }

    stack.push(Frame {
        name,
        text: String::new(),
        has_children: false,
    });
}

fn close_element(
    stack: &mut Vec<Frame>,
    current: &mut Option<CardBuilder>,
    cards: &mut Vec<Card>,
) -> Result<()> {
    let Some(frame) = stack.pop() else {
        return Ok(());
    };
    // Elements holding other elements, like card-valued properties, have no text value
    let text = if frame.has_children {
        String::new()
    } else {
        frame.text
    };

    let mut path: Vec<&str> = stack.iter().skip(1).map(|f| f.name.as_str()).collect();
    if stack.is_empty() {
        return Ok(());
    }
    path.push(frame.name.as_str());

    match path.as_slice() {
        ["card"] => {
            if let Some(card) = current.take() {
                cards.push(card.build()?);
            }
        }
        ["card", rest @ ..] => {
            let Some(card) = current.as_mut() else {
                return Ok(());
            };
            match rest {
                ["name"] => card.name = text,
                ["number"] => {
                    let number = text.trim().parse::<u64>().map_err(|_| {
                        MingleError::ParseError(format!("invalid card number '{text}'"))
                    })?;
                    card.number = Some(number);
                }
                ["card_type", "name"] => card.card_type = text,
                ["properties", "property"] => {
                    if let Some(property) = card.property.take() {
                        card.properties.push(property);
                    }
                }
                ["properties", "property", "name"] => {
                    if let Some(property) = card.property.as_mut() {
                        property.name = text;
                    }
                }
                ["properties", "property", "value"] => {
                    if let Some(property) = card.property.as_mut() {
                        property.value = text;
                    }
                }
                _ => {}
            }
        }
        _ => {}
    }
    Ok(())
}

#[async_trait]
impl List for Card {
    /// Project identifier.
    type Query = String;

    fn sequence_number(&self) -> u64 {
        self.number
    }

    #[tracing::instrument(skip(client))]
    async fn list_page(
        client: &MingleClient,
        query: &Self::Query,
        page: u32,
    ) -> Result<Page<Self>> {
        let path = format!(
            "api/v2/projects/{}/cards.xml",
            urlencoding::encode(query)
        );

        let params = PaginationParams {
            page,
            sort: SORT_ATTRIBUTE,
            order: SORT_ORDER,
        };

        let response = client.get_with_query(&path, &params).await?;
        let body = response.text().await.map_err(MingleError::HttpError)?;
        let cards = parse_cards(&body)?;

        Ok(Page::new(cards, page, PAGE_SIZE))
    }
}

// =============================================================================
// Convenience Functions
// =============================================================================

/// Fetch every card of a project, sorted ascending by number.
///
/// # Arguments
///
/// * `client` - The Mingle API client
/// * `project_id` - The project identifier
pub async fn get_cards(client: &MingleClient, project_id: &str) -> Result<Vec<Card>> {
    Card::list_all(client, &project_id.to_string()).await
}

/// Fetch a single page of a project's cards.
///
/// # Arguments
///
/// * `client` - The Mingle API client
/// * `project_id` - The project identifier
/// * `page` - Page number (1-indexed)
pub async fn get_cards_page(
    client: &MingleClient,
    project_id: &str,
    page: u32,
) -> Result<Page<Card>> {
    Card::list_page(client, &project_id.to_string(), page).await
}
