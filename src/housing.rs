//! Melbourne house sales, the records the benchmark feeds to the table.
//!
//! Each CSV line has 13 columns:
//!
//! ```text
//! Suburb,Address,Rooms,Type,Price,Method,SellerG,Date,Postcode,Regionname,Propertycount,Distance,CouncilArea
//! Abbotsford,49 Lithgow St,3,h,"$1,876,000",S,Nelson,1/04/2017,3067,Northern Metropolitan,4019,3,Yarra City Council
//! ```
//!
//! Lines are split on every `,` without honouring quotes, so a price
//! written with thousands separators produces a line with the wrong number
//! of fields, and such lines are skipped like any other malformed one.

use std::cmp::Ordering;
use std::fmt::Display;
use std::hash::{Hash, Hasher};
use std::io::BufRead;

use crate::warn;

pub const COLUMNS: usize = 13;

const HEADERS: [&str; COLUMNS] = [
    "Suburb",
    "Address",
    "Rooms",
    "Type",
    "Price",
    "Method",
    "SellerG",
    "Date",
    "Postcode",
    "Regionname",
    "Propertycount",
    "Distance",
    "CouncilArea",
];

/// One sale. Equality and hashing look at every column; ordering puts the
/// most expensive first.
#[derive(Debug, Clone, Default)]
pub struct HouseSale {
    pub suburb: String,
    pub address: String,
    pub rooms: u32,
    /// `h` house, `u` unit, `t` townhouse.
    pub kind: char,
    pub price: u32,
    /// `S` sold, `PI` passed in, `VB` vendor bid...
    pub method: char,
    pub seller: String,
    pub date: String,
    pub postcode: u32,
    pub region: String,
    pub property_count: u32,
    /// Kilometres from the CBD.
    pub distance: f64,
    pub council_area: String,
}

#[derive(Debug, PartialEq)]
pub enum ParseError {
    /// The line didn't split into [`COLUMNS`] fields.
    FieldCount(usize),
    InvalidNumber { column: &'static str, value: String },
}

/// What [`read_records`] made of the input.
#[derive(Debug, Default)]
pub struct Ingest {
    pub records: Vec<HouseSale>,
    /// Lines that were read but couldn't be turned into a record.
    pub skipped: usize,
}

impl HouseSale {
    /// Trailing empty fields don't count, so a line whose last columns are
    /// blank is short and gets rejected.
    pub fn parse_line(line: &str) -> Result<Self, ParseError> {
        let mut fields: Vec<&str> = line.split(',').collect();
        let kept = fields.iter().rposition(|field| !field.is_empty()).map_or(0, |last| last + 1);
        fields.truncate(kept);

        let &[suburb, address, rooms, kind, price, method, seller, date, postcode, region, property_count, distance, council_area] =
            fields.as_slice()
        else {
            return Err(ParseError::FieldCount(fields.len()));
        };

        let price: String = price.chars().filter(|c| !matches!(c, '$' | ',')).collect();

        Ok(Self {
            suburb: suburb.to_string(),
            address: address.to_string(),
            rooms: number(2, rooms)?,
            kind: first_char(kind),
            price: number(4, price.trim())?,
            method: first_char(method),
            seller: seller.to_string(),
            date: date.to_string(),
            postcode: number(8, postcode)?,
            region: region.to_string(),
            property_count: number(10, property_count)?,
            distance: number(11, distance)?,
            council_area: council_area.to_string(),
        })
    }
}

/// Empty fields count as zero.
fn number<N: std::str::FromStr + Default>(column: usize, field: &str) -> Result<N, ParseError> {
    if field.is_empty() {
        return Ok(N::default());
    }

    field.parse().map_err(|_| ParseError::InvalidNumber {
        column: HEADERS[column],
        value: field.to_string(),
    })
}

/// Empty fields become a blank.
fn first_char(field: &str) -> char {
    field.chars().next().unwrap_or(' ')
}

/// Reads up to `limit` records, skipping the header line.
///
/// Lines with the wrong number of fields are skipped quietly, the ones with
/// bad numbers get a warning in the log. Only I/O errors stop the read.
pub fn read_records(reader: impl BufRead, limit: usize) -> std::io::Result<Ingest> {
    let mut ingest = Ingest::default();
    let mut lines = reader.lines().skip(1);

    while ingest.records.len() < limit {
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        match HouseSale::parse_line(&line) {
            Ok(record) => ingest.records.push(record),
            Err(ParseError::FieldCount(_)) => ingest.skipped += 1,
            Err(err) => {
                warn!("skipping line {line:?}: {err}");
                ingest.skipped += 1;
            }
        }
    }

    Ok(ingest)
}

impl PartialEq for HouseSale {
    fn eq(&self, other: &Self) -> bool {
        self.rooms == other.rooms
            && self.price == other.price
            && self.suburb == other.suburb
            && self.address == other.address
            && self.kind == other.kind
            && self.method == other.method
            && self.seller == other.seller
            && self.date == other.date
            && self.postcode == other.postcode
            && self.region == other.region
            && self.property_count == other.property_count
            && self.distance.to_bits() == other.distance.to_bits()
            && self.council_area == other.council_area
    }
}

impl Eq for HouseSale {}

impl Hash for HouseSale {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.suburb.hash(state);
        self.address.hash(state);
        self.rooms.hash(state);
        self.kind.hash(state);
        self.price.hash(state);
        self.method.hash(state);
        self.seller.hash(state);
        self.date.hash(state);
        self.postcode.hash(state);
        self.region.hash(state);
        self.property_count.hash(state);
        self.distance.to_bits().hash(state);
        self.council_area.hash(state);
    }
}

impl Ord for HouseSale {
    /// Price, highest first. Sales at the same price fall back to the other
    /// columns so only equal sales compare `Equal`.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .price
            .cmp(&self.price)
            .then_with(|| self.suburb.cmp(&other.suburb))
            .then_with(|| self.address.cmp(&other.address))
            .then_with(|| self.rooms.cmp(&other.rooms))
            .then_with(|| self.kind.cmp(&other.kind))
            .then_with(|| self.method.cmp(&other.method))
            .then_with(|| self.seller.cmp(&other.seller))
            .then_with(|| self.date.cmp(&other.date))
            .then_with(|| self.postcode.cmp(&other.postcode))
            .then_with(|| self.region.cmp(&other.region))
            .then_with(|| self.property_count.cmp(&other.property_count))
            .then_with(|| self.distance.total_cmp(&other.distance))
            .then_with(|| self.council_area.cmp(&other.council_area))
    }
}

impl PartialOrd for HouseSale {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for HouseSale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: Address: {}, Rooms: {}, Type: {}, Price: ${}, Method: {}, Seller: {}, \
             Date: {}, Postcode: {}, Region: {}, Property Count: {}, Distance: {:.1} km, \
             Council Area: {}",
            self.suburb,
            self.address,
            self.rooms,
            self.kind,
            thousands(self.price),
            self.method,
            self.seller,
            self.date,
            self.postcode,
            self.region,
            self.property_count,
            self.distance,
            self.council_area
        )
    }
}

/// `1035000` -> `1,035,000`.
fn thousands(n: u32) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }

    out
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FieldCount(found) => write!(f, "expected {COLUMNS} fields but found {found}"),
            Self::InvalidNumber { column, value } => {
                write!(f, "column {column} should be a number, found {value:?}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = "Suburb,Address,Rooms,Type,Price,Method,SellerG,Date,Postcode,Regionname,Propertycount,Distance,CouncilArea";
    const ABBOTSFORD: &str = "Abbotsford,85 Turner St,2,h,$1480000,S,Biggin,3/12/2016,3067,Northern Metropolitan,4019,2.5,Yarra City Council";

    #[test]
    fn parse_a_full_line() {
        let sale = HouseSale::parse_line(ABBOTSFORD).unwrap();

        assert_eq!(sale.suburb, "Abbotsford");
        assert_eq!(sale.address, "85 Turner St");
        assert_eq!(sale.rooms, 2);
        assert_eq!(sale.kind, 'h');
        assert_eq!(sale.price, 1_480_000);
        assert_eq!(sale.method, 'S');
        assert_eq!(sale.postcode, 3067);
        assert_eq!(sale.property_count, 4019);
        assert_eq!(sale.distance, 2.5);
        assert_eq!(sale.council_area, "Yarra City Council");
    }

    #[test]
    fn empty_fields_have_defaults() {
        let sale =
            HouseSale::parse_line("Kew,1 Main Rd,,,,,Jellis,1/1/2017,,,,,Boroondara City Council")
                .unwrap();

        assert_eq!(sale.rooms, 0);
        assert_eq!(sale.kind, ' ');
        assert_eq!(sale.price, 0);
        assert_eq!(sale.method, ' ');
        assert_eq!(sale.postcode, 0);
        assert_eq!(sale.distance, 0.0);
        assert_eq!(sale.council_area, "Boroondara City Council");
    }

    #[test]
    fn trailing_empty_fields_make_a_short_line() {
        let line = "Kew,1 Main Rd,3,h,$900000,S,Jellis,1/1/2017,3101,Southern Metropolitan,5000,5.2,";
        assert_eq!(HouseSale::parse_line(line), Err(ParseError::FieldCount(12)));

        let line = "Kew,1 Main Rd,3,h,$900000,S,Jellis,1/1/2017,3101,,,,";
        assert_eq!(HouseSale::parse_line(line), Err(ParseError::FieldCount(9)));

        let input = [HEADER, line, ABBOTSFORD].join("\n");
        let ingest = read_records(Cursor::new(input), 10).unwrap();
        assert_eq!(ingest.records.len(), 1);
        assert_eq!(ingest.skipped, 1);
    }

    #[test]
    fn same_price_is_not_the_same_sale() {
        let kew = HouseSale {
            suburb: "Kew".to_string(),
            price: 500_000,
            ..Default::default()
        };
        let carlton = HouseSale {
            suburb: "Carlton".to_string(),
            ..kew.clone()
        };

        assert_ne!(kew, carlton);
        assert_ne!(kew.cmp(&carlton), Ordering::Equal);
        assert_eq!(kew.cmp(&carlton), carlton.cmp(&kew).reverse());
        assert_eq!(kew.cmp(&kew.clone()), Ordering::Equal);

        let cheaper = HouseSale {
            price: 400_000,
            ..carlton.clone()
        };
        assert_eq!(kew.cmp(&cheaper), Ordering::Less);
    }

    #[test]
    fn wrong_field_count() {
        assert_eq!(
            HouseSale::parse_line("Kew,1 Main Rd,3"),
            Err(ParseError::FieldCount(3))
        );
        assert_eq!(
            HouseSale::parse_line(HEADER).map(|_| ()),
            Err(ParseError::InvalidNumber {
                column: "Rooms",
                value: "Rooms".to_string(),
            })
        );
    }

    #[test]
    fn bad_numbers_name_the_column() {
        let line = ABBOTSFORD.replace("$1480000", "$14x0");

        assert_eq!(
            HouseSale::parse_line(&line),
            Err(ParseError::InvalidNumber {
                column: "Price",
                value: "14x0".to_string(),
            })
        );
    }

    #[test]
    fn equal_sales_hash_equally() {
        use std::hash::BuildHasher;

        let a = HouseSale::parse_line(ABBOTSFORD).unwrap();
        let b = a.clone();
        let mut c = a.clone();
        c.distance = 2.6;

        let state = crate::BuildHasher;
        assert_eq!(a, b);
        assert_eq!(state.hash_one(&a), state.hash_one(&b));
        assert_ne!(a, c);
    }

    #[test]
    fn most_expensive_sorts_first() {
        let mut sales: Vec<HouseSale> = [400_000, 1_200_000, 750_000]
            .into_iter()
            .map(|price| HouseSale {
                price,
                ..Default::default()
            })
            .collect();
        sales.sort();

        let prices: Vec<u32> = sales.iter().map(|sale| sale.price).collect();
        assert_eq!(prices, [1_200_000, 750_000, 400_000]);
    }

    #[test]
    fn display_groups_thousands() {
        let sale = HouseSale::parse_line(ABBOTSFORD).unwrap();
        let shown = sale.to_string();

        assert!(shown.starts_with("Abbotsford: Address: 85 Turner St"));
        assert!(shown.contains("Price: $1,480,000"));
        assert!(shown.contains("Distance: 2.5 km"));
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1000), "1,000");
    }

    #[test]
    fn read_stops_at_the_limit() {
        let input = [HEADER, ABBOTSFORD, "broken,line", ABBOTSFORD, ABBOTSFORD].join("\n");
        let ingest = read_records(Cursor::new(input), 2).unwrap();

        assert_eq!(ingest.records.len(), 2);
        assert_eq!(ingest.skipped, 1);
    }

    #[test]
    fn read_with_short_input() {
        let input = format!("{HEADER}\n{ABBOTSFORD}\n");
        let ingest = read_records(Cursor::new(input), 100).unwrap();

        assert_eq!(ingest.records.len(), 1);
        assert_eq!(ingest.skipped, 0);
    }
}
